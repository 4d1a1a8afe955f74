//! Execute request payloads.
//!
//! Validates and assembles the JSON bodies handed to transport. Place-order
//! requests carry the order record directly; every other execute carries a
//! raw `tx` map plus its signature.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::appendix::Appendix;
use crate::eip712::TxType;
use crate::nonce::gen_order_nonce;
use crate::signing::ExecuteSigner;
use crate::subaccount::normalize_sender;
use crate::tx::{dec_str, Order};
use crate::{Error, Result};

/// Order fields as supplied by a caller; the nonce may still be unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderParams {
    pub sender: B256,
    #[serde(rename = "priceX18", with = "dec_str")]
    pub price_x18: i128,
    #[serde(with = "dec_str")]
    pub amount: i128,
    #[serde(with = "dec_str")]
    pub expiration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "opt_dec_str")]
    pub nonce: Option<u64>,
    pub appendix: Appendix,
}

impl OrderParams {
    /// The signable order, failing when the nonce is unset.
    pub fn to_order(&self) -> Result<Order> {
        let nonce = self
            .nonce
            .ok_or_else(|| Error::encoding("Missing order `nonce`"))?;
        Ok(Order {
            sender: self.sender,
            price_x18: self.price_x18,
            amount: self.amount,
            expiration: self.expiration,
            nonce,
            appendix: self.appendix,
        })
    }
}

impl From<Order> for OrderParams {
    fn from(order: Order) -> Self {
        Self {
            sender: order.sender,
            price_x18: order.price_x18,
            amount: order.amount,
            expiration: order.expiration,
            nonce: Some(order.nonce),
            appendix: order.appendix,
        }
    }
}

/// Place-order parameters before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderParams {
    pub product_id: u32,
    pub order: OrderParams,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub spot_leverage: Option<bool>,
    #[serde(default)]
    pub id: Option<u64>,
}

/// A validated `place_order` execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub product_id: u32,
    pub order: Order,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_leverage: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl TryFrom<PlaceOrderParams> for PlaceOrderRequest {
    type Error = Error;

    fn try_from(params: PlaceOrderParams) -> Result<Self> {
        let order = params.order.to_order()?;
        let signature = params
            .signature
            .ok_or_else(|| Error::encoding("Missing `signature`"))?;
        Ok(Self {
            product_id: params.product_id,
            order,
            signature,
            digest: params.digest,
            spot_leverage: params.spot_leverage,
            id: params.id,
        })
    }
}

impl PlaceOrderRequest {
    /// Execute body: `{"place_order": {...}}`.
    pub fn to_payload(&self) -> Result<Value> {
        Ok(execute_body(TxType::PlaceOrder, serde_json::to_value(self)?))
    }
}

/// Validate `params` into a place-order request.
pub fn prepare_place_order(params: PlaceOrderParams) -> Result<PlaceOrderRequest> {
    PlaceOrderRequest::try_from(params)
}

/// A validated non-order execute: raw message plus signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRequest {
    pub tx: Map<String, Value>,
    pub signature: String,
}

impl TxRequest {
    /// Validate a raw message: `nonce` must be present and non-null, and
    /// `sender` is rewritten to canonical bytes32 hex.
    pub fn new(mut tx: Map<String, Value>, signature: impl Into<String>) -> Result<Self> {
        match tx.get("nonce") {
            None | Some(Value::Null) => return Err(Error::encoding("Missing tx `nonce`")),
            Some(_) => {}
        }
        if let Some(sender) = tx.get("sender") {
            let sender = sender
                .as_str()
                .ok_or_else(|| Error::encoding(format!("Invalid tx `sender`: {sender}")))?;
            let normalized = normalize_sender(sender)?;
            tx.insert("sender".to_string(), Value::String(normalized));
        }
        Ok(Self {
            tx,
            signature: signature.into(),
        })
    }

    /// Execute body: `{"<tx_type>": {"tx": {...}, "signature": "0x.."}}`.
    pub fn to_payload(&self, tx_type: TxType) -> Result<Value> {
        Ok(execute_body(tx_type, serde_json::to_value(self)?))
    }
}

impl ExecuteSigner {
    /// Fill a missing nonce, sign and validate a place-order execute.
    ///
    /// A caller-provided signature is kept as is.
    pub fn prepare_place_order(&self, mut params: PlaceOrderParams) -> Result<PlaceOrderRequest> {
        if params.order.nonce.is_none() {
            params.order.nonce = Some(gen_order_nonce(None));
        }
        if params.signature.is_none() {
            let signed = self.sign_order(params.order.to_order()?, params.product_id)?;
            params.signature = Some(signed.signature);
            params.digest = Some(signed.digest);
        }
        debug!(product_id = params.product_id, "place order prepared");
        prepare_place_order(params)
    }

    /// Sign a non-order transaction and wrap it as an execute body.
    pub fn prepare_tx<M: crate::tx::NadoMessage>(&self, tx: M) -> Result<Value> {
        let signed = self.sign_tx(tx)?;
        TxRequest::new(signed.tx.to_message()?, signed.signature)?.to_payload(M::TX_TYPE)
    }
}

fn execute_body(tx_type: TxType, body: Value) -> Value {
    let mut wrapper = Map::new();
    wrapper.insert(tx_type.as_str().to_string(), body);
    Value::Object(wrapper)
}

mod opt_dec_str {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.collect_str(v),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "crate::tx::dec_str")] u64);

        let v: Option<Wrapper> = Option::deserialize(d)?;
        Ok(v.map(|Wrapper(n)| n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appendix::AppendixBuilder;
    use crate::config::Config;
    use crate::expiration::OrderType;
    use crate::subaccount::hex_to_bytes32;
    use crate::tx::MintNlp;
    use alloy_primitives::Address;
    use alloy_signer_local::PrivateKeySigner;
    use std::str::FromStr;

    const SENDER: &str = "0x841fe4876763357975d60da128d8a54bb045d76a64656661756c740000000000";

    fn params(nonce: Option<u64>, signature: Option<&str>) -> PlaceOrderParams {
        PlaceOrderParams {
            product_id: 1,
            order: OrderParams {
                sender: hex_to_bytes32(SENDER).unwrap(),
                price_x18: 1_000,
                amount: -5,
                expiration: 10,
                nonce,
                appendix: AppendixBuilder::new(OrderType::Ioc).build().unwrap(),
            },
            signature: signature.map(str::to_string),
            digest: None,
            spot_leverage: None,
            id: None,
        }
    }

    fn signer() -> ExecuteSigner {
        let key = PrivateKeySigner::from_str(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let endpoint: Address = "0x2279B7A0a67DB372996a5FaB50D91eAA73d2eBe6".parse().unwrap();
        ExecuteSigner::new(key, Config::new(31337, endpoint))
    }

    #[test]
    fn test_place_order_requires_nonce() {
        let err = prepare_place_order(params(None, Some("0x01"))).unwrap_err();
        assert!(err.to_string().contains("Missing order `nonce`"));
    }

    #[test]
    fn test_place_order_requires_signature() {
        let err = prepare_place_order(params(Some(1), None)).unwrap_err();
        assert!(err.to_string().contains("Missing `signature`"));
    }

    #[test]
    fn test_place_order_payload_shape() {
        let request = prepare_place_order(params(Some(7), Some("0xabc"))).unwrap();
        let payload = request.to_payload().unwrap();

        let body = &payload["place_order"];
        assert_eq!(body["product_id"], 1);
        assert_eq!(body["signature"], "0xabc");
        assert_eq!(body["order"]["nonce"], "7");
        assert_eq!(body["order"]["priceX18"], "1000");
        assert_eq!(body["order"]["amount"], "-5");
        assert_eq!(body["order"]["appendix"], "512");
        assert!(body.get("digest").is_none());
    }

    #[test]
    fn test_order_params_nonce_from_string_or_missing() {
        let json = serde_json::json!({
            "sender": SENDER,
            "priceX18": "1000",
            "amount": "-5",
            "expiration": "10",
            "appendix": "0"
        });
        let p: OrderParams = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(p.nonce, None);

        let mut with_nonce = json;
        with_nonce["nonce"] = serde_json::json!("42");
        let p: OrderParams = serde_json::from_value(with_nonce).unwrap();
        assert_eq!(p.nonce, Some(42));
    }

    #[test]
    fn test_tx_request_requires_nonce() {
        let mut tx = Map::new();
        tx.insert("sender".into(), Value::String(SENDER.into()));
        assert!(TxRequest::new(tx.clone(), "0x00").is_err());

        tx.insert("nonce".into(), Value::Null);
        assert!(TxRequest::new(tx.clone(), "0x00").is_err());

        tx.insert("nonce".into(), Value::String("1".into()));
        assert!(TxRequest::new(tx, "0x00").is_ok());
    }

    #[test]
    fn test_tx_request_normalizes_sender() {
        let mut tx = Map::new();
        tx.insert(
            "sender".into(),
            Value::String("841FE4876763357975D60DA128D8A54BB045D76A64656661756C74".into()),
        );
        tx.insert("nonce".into(), Value::String("1".into()));

        let request = TxRequest::new(tx, "0x00").unwrap();
        assert_eq!(request.tx["sender"], SENDER);
    }

    #[test]
    fn test_signer_prepares_place_order() {
        let s = signer();
        let request = s.prepare_place_order(params(None, None)).unwrap();

        assert!(request.order.nonce > 0);
        assert!(request.signature.starts_with("0x"));
        assert_eq!(
            request.digest.as_deref(),
            Some(format!("0x{}", hex::encode(s.order_digest(&request.order, 1).unwrap())).as_str())
        );
    }

    #[test]
    fn test_signer_keeps_given_signature() {
        let request = signer().prepare_place_order(params(Some(3), Some("0xfeed"))).unwrap();
        assert_eq!(request.signature, "0xfeed");
        assert_eq!(request.order.nonce, 3);
    }

    #[test]
    fn test_signer_prepares_tx_payload() {
        let tx = MintNlp {
            sender: hex_to_bytes32(SENDER).unwrap(),
            quote_amount: 1_000_000,
            nonce: 9,
        };
        let payload = signer().prepare_tx(tx).unwrap();

        let body = &payload["mint_nlp"];
        assert_eq!(body["tx"]["sender"], SENDER);
        assert_eq!(body["tx"]["quoteAmount"], "1000000");
        assert_eq!(body["tx"]["nonce"], "9");
        assert!(body["signature"].as_str().unwrap().starts_with("0x"));
    }
}
