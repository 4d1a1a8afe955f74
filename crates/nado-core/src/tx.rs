//! Strongly-typed Nado transaction records.
//!
//! One record per [`TxType`]. Each renders the message map that goes into the
//! typed data; field names and order follow the registry schema, integers are
//! rendered as decimal strings and bytes32 values as lowercase hex.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::appendix::Appendix;
use crate::eip712::TxType;
use crate::{Error, Result};

/// A record that can be signed as a Nado transaction.
pub trait NadoMessage: Serialize {
    const TX_TYPE: TxType;

    /// The typed-data message for this record.
    fn to_message(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::encoding(format!(
                "{} must serialize to an object, got {other}",
                Self::TX_TYPE
            ))),
        }
    }
}

/// Serialize integers as decimal strings, accept strings or numbers back.
pub mod dec_str {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T: Display, S: Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(d: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Num(serde_json::Number),
        }

        let raw = match Raw::deserialize(d)? {
            Raw::Str(s) => s,
            Raw::Num(n) => n.to_string(),
        };
        raw.parse().map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub sender: B256,
    #[serde(with = "dec_str")]
    pub price_x18: i128,
    #[serde(with = "dec_str")]
    pub amount: i128,
    #[serde(with = "dec_str")]
    pub expiration: u64,
    #[serde(with = "dec_str")]
    pub nonce: u64,
    pub appendix: Appendix,
}

impl NadoMessage for Order {
    const TX_TYPE: TxType = TxType::PlaceOrder;
}

/// Cancel specific orders by digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cancellation {
    pub sender: B256,
    pub product_ids: Vec<u32>,
    pub digests: Vec<B256>,
    #[serde(with = "dec_str")]
    pub nonce: u64,
}

impl NadoMessage for Cancellation {
    const TX_TYPE: TxType = TxType::CancelOrders;
}

/// Cancel every order on the given products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationProducts {
    pub sender: B256,
    pub product_ids: Vec<u32>,
    #[serde(with = "dec_str")]
    pub nonce: u64,
}

impl NadoMessage for CancellationProducts {
    const TX_TYPE: TxType = TxType::CancelProductOrders;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawCollateral {
    pub sender: B256,
    pub product_id: u32,
    #[serde(with = "dec_str")]
    pub amount: u128,
    #[serde(with = "dec_str")]
    pub nonce: u64,
}

impl NadoMessage for WithdrawCollateral {
    const TX_TYPE: TxType = TxType::WithdrawCollateral;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidateSubaccount {
    pub sender: B256,
    pub liquidatee: B256,
    pub product_id: u32,
    pub is_encoded_spread: bool,
    #[serde(with = "dec_str")]
    pub amount: i128,
    #[serde(with = "dec_str")]
    pub nonce: u64,
}

impl NadoMessage for LiquidateSubaccount {
    const TX_TYPE: TxType = TxType::LiquidateSubaccount;
}

/// Mint liquidity tokens against quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintNlp {
    pub sender: B256,
    #[serde(with = "dec_str")]
    pub quote_amount: u128,
    #[serde(with = "dec_str")]
    pub nonce: u64,
}

impl NadoMessage for MintNlp {
    const TX_TYPE: TxType = TxType::MintNlp;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnNlp {
    pub sender: B256,
    #[serde(with = "dec_str")]
    pub nlp_amount: u128,
    #[serde(with = "dec_str")]
    pub nonce: u64,
}

impl NadoMessage for BurnNlp {
    const TX_TYPE: TxType = TxType::BurnNlp;
}

/// Authorize `signer` to sign executes on behalf of `sender`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSigner {
    pub sender: B256,
    pub signer: B256,
    #[serde(with = "dec_str")]
    pub nonce: u64,
}

impl NadoMessage for LinkSigner {
    const TX_TYPE: TxType = TxType::LinkSigner;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamAuthentication {
    pub sender: B256,
    #[serde(with = "dec_str")]
    pub expiration: u64,
}

impl NadoMessage for StreamAuthentication {
    const TX_TYPE: TxType = TxType::AuthenticateStream;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTriggerOrders {
    pub sender: B256,
    #[serde(with = "dec_str")]
    pub recv_time: u64,
}

impl NadoMessage for ListTriggerOrders {
    const TX_TYPE: TxType = TxType::ListTriggerOrders;
}
