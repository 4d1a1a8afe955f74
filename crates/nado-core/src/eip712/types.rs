//! Transaction type registry.
//!
//! Each Nado transaction kind maps to exactly one EIP-712 struct schema. Field
//! order is part of the hash, so schemas must match the verifying contract's
//! ABI exactly and are never reordered. New kinds are appended.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Error, Result};

/// A `(name, type)` member of an EIP-712 struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Eip712Field {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
}

impl Eip712Field {
    pub fn new(name: impl Into<String>, r#type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.into(),
        }
    }
}

/// Static schema of one transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxSchema {
    pub primary_type: &'static str,
    pub fields: &'static [(&'static str, &'static str)],
}

impl TxSchema {
    /// Owned field list for embedding in typed data.
    pub fn eip712_fields(&self) -> Vec<Eip712Field> {
        self.fields
            .iter()
            .map(|(name, ty)| Eip712Field::new(*name, *ty))
            .collect()
    }

    /// Field names in canonical order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }
}

const ORDER: TxSchema = TxSchema {
    primary_type: "Order",
    fields: &[
        ("sender", "bytes32"),
        ("priceX18", "int128"),
        ("amount", "int128"),
        ("expiration", "uint64"),
        ("nonce", "uint64"),
        ("appendix", "int128"),
    ],
};

const CANCELLATION: TxSchema = TxSchema {
    primary_type: "Cancellation",
    fields: &[
        ("sender", "bytes32"),
        ("productIds", "uint32[]"),
        ("digests", "bytes32[]"),
        ("nonce", "uint64"),
    ],
};

const CANCELLATION_PRODUCTS: TxSchema = TxSchema {
    primary_type: "CancellationProducts",
    fields: &[
        ("sender", "bytes32"),
        ("productIds", "uint32[]"),
        ("nonce", "uint64"),
    ],
};

const WITHDRAW_COLLATERAL: TxSchema = TxSchema {
    primary_type: "WithdrawCollateral",
    fields: &[
        ("sender", "bytes32"),
        ("productId", "uint32"),
        ("amount", "uint128"),
        ("nonce", "uint64"),
    ],
};

const LIQUIDATE_SUBACCOUNT: TxSchema = TxSchema {
    primary_type: "LiquidateSubaccount",
    fields: &[
        ("sender", "bytes32"),
        ("liquidatee", "bytes32"),
        ("productId", "uint32"),
        ("isEncodedSpread", "bool"),
        ("amount", "int128"),
        ("nonce", "uint64"),
    ],
};

const MINT_NLP: TxSchema = TxSchema {
    primary_type: "MintNlp",
    fields: &[
        ("sender", "bytes32"),
        ("quoteAmount", "uint128"),
        ("nonce", "uint64"),
    ],
};

const BURN_NLP: TxSchema = TxSchema {
    primary_type: "BurnNlp",
    fields: &[
        ("sender", "bytes32"),
        ("nlpAmount", "uint128"),
        ("nonce", "uint64"),
    ],
};

const LINK_SIGNER: TxSchema = TxSchema {
    primary_type: "LinkSigner",
    fields: &[
        ("sender", "bytes32"),
        ("signer", "bytes32"),
        ("nonce", "uint64"),
    ],
};

const STREAM_AUTHENTICATION: TxSchema = TxSchema {
    primary_type: "StreamAuthentication",
    fields: &[("sender", "bytes32"), ("expiration", "uint64")],
};

const LIST_TRIGGER_ORDERS: TxSchema = TxSchema {
    primary_type: "ListTriggerOrders",
    fields: &[("sender", "bytes32"), ("recvTime", "uint64")],
};

/// Closed set of signable Nado transaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxType {
    #[serde(rename = "place_order")]
    PlaceOrder,
    #[serde(rename = "cancel_orders")]
    CancelOrders,
    #[serde(rename = "cancel_product_orders")]
    CancelProductOrders,
    #[serde(rename = "withdraw_collateral")]
    WithdrawCollateral,
    #[serde(rename = "liquidate_subaccount")]
    LiquidateSubaccount,
    #[serde(rename = "mint_nlp")]
    MintNlp,
    #[serde(rename = "burn_nlp")]
    BurnNlp,
    #[serde(rename = "link_signer")]
    LinkSigner,
    #[serde(rename = "authenticate")]
    AuthenticateStream,
    #[serde(rename = "list_trigger_orders")]
    ListTriggerOrders,
}

impl TxType {
    pub const ALL: [TxType; 10] = [
        TxType::PlaceOrder,
        TxType::CancelOrders,
        TxType::CancelProductOrders,
        TxType::WithdrawCollateral,
        TxType::LiquidateSubaccount,
        TxType::MintNlp,
        TxType::BurnNlp,
        TxType::LinkSigner,
        TxType::AuthenticateStream,
        TxType::ListTriggerOrders,
    ];

    /// Wire name of the transaction kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::PlaceOrder => "place_order",
            TxType::CancelOrders => "cancel_orders",
            TxType::CancelProductOrders => "cancel_product_orders",
            TxType::WithdrawCollateral => "withdraw_collateral",
            TxType::LiquidateSubaccount => "liquidate_subaccount",
            TxType::MintNlp => "mint_nlp",
            TxType::BurnNlp => "burn_nlp",
            TxType::LinkSigner => "link_signer",
            TxType::AuthenticateStream => "authenticate",
            TxType::ListTriggerOrders => "list_trigger_orders",
        }
    }

    /// The EIP-712 schema for this kind.
    pub fn schema(&self) -> &'static TxSchema {
        match self {
            TxType::PlaceOrder => &ORDER,
            TxType::CancelOrders => &CANCELLATION,
            TxType::CancelProductOrders => &CANCELLATION_PRODUCTS,
            TxType::WithdrawCollateral => &WITHDRAW_COLLATERAL,
            TxType::LiquidateSubaccount => &LIQUIDATE_SUBACCOUNT,
            TxType::MintNlp => &MINT_NLP,
            TxType::BurnNlp => &BURN_NLP,
            TxType::LinkSigner => &LINK_SIGNER,
            TxType::AuthenticateStream => &STREAM_AUTHENTICATION,
            TxType::ListTriggerOrders => &LIST_TRIGGER_ORDERS,
        }
    }

    pub fn primary_type(&self) -> &'static str {
        self.schema().primary_type
    }

    /// Orders are verified by a per-product contract; everything else by the
    /// endpoint.
    pub fn uses_product_verifying_contract(&self) -> bool {
        matches!(self, TxType::PlaceOrder)
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TxType::ALL
            .into_iter()
            .find(|tx| tx.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = TxType::ALL.iter().map(TxType::as_str).collect();
                Error::schema(format!(
                    "Unsupported transaction type: {s}. Supported types: {valid:?}"
                ))
            })
    }
}

/// Schema lookup by kind.
pub fn schema_for(tx: TxType) -> &'static TxSchema {
    tx.schema()
}
