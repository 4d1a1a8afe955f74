//! Trigger criteria and the trigger-order execute payload.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::eip712::TxType;
use crate::nonce::gen_order_nonce;
use crate::request::OrderParams;
use crate::signing::ExecuteSigner;
use crate::tx::{dec_str, Order};
use crate::{Error, Result};

/// Which price a price trigger watches, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTriggerKind {
    LastPriceAbove,
    LastPriceBelow,
    OraclePriceAbove,
    OraclePriceBelow,
    MidPriceAbove,
    MidPriceBelow,
}

impl PriceTriggerKind {
    pub const ALL: [PriceTriggerKind; 6] = [
        PriceTriggerKind::LastPriceAbove,
        PriceTriggerKind::LastPriceBelow,
        PriceTriggerKind::OraclePriceAbove,
        PriceTriggerKind::OraclePriceBelow,
        PriceTriggerKind::MidPriceAbove,
        PriceTriggerKind::MidPriceBelow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTriggerKind::LastPriceAbove => "last_price_above",
            PriceTriggerKind::LastPriceBelow => "last_price_below",
            PriceTriggerKind::OraclePriceAbove => "oracle_price_above",
            PriceTriggerKind::OraclePriceBelow => "oracle_price_below",
            PriceTriggerKind::MidPriceAbove => "mid_price_above",
            PriceTriggerKind::MidPriceBelow => "mid_price_below",
        }
    }
}

impl fmt::Display for PriceTriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceTriggerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let supported: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                Error::schema(format!(
                    "Unsupported trigger_type: {s}. Supported types: {supported:?}"
                ))
            })
    }
}

/// Price condition with its x18 threshold; serialized as `{"<kind>": "<price>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRequirement {
    LastPriceAbove(#[serde(with = "dec_str")] i128),
    LastPriceBelow(#[serde(with = "dec_str")] i128),
    OraclePriceAbove(#[serde(with = "dec_str")] i128),
    OraclePriceBelow(#[serde(with = "dec_str")] i128),
    MidPriceAbove(#[serde(with = "dec_str")] i128),
    MidPriceBelow(#[serde(with = "dec_str")] i128),
}

impl PriceRequirement {
    pub fn new(kind: PriceTriggerKind, price_x18: i128) -> Self {
        match kind {
            PriceTriggerKind::LastPriceAbove => PriceRequirement::LastPriceAbove(price_x18),
            PriceTriggerKind::LastPriceBelow => PriceRequirement::LastPriceBelow(price_x18),
            PriceTriggerKind::OraclePriceAbove => PriceRequirement::OraclePriceAbove(price_x18),
            PriceTriggerKind::OraclePriceBelow => PriceRequirement::OraclePriceBelow(price_x18),
            PriceTriggerKind::MidPriceAbove => PriceRequirement::MidPriceAbove(price_x18),
            PriceTriggerKind::MidPriceBelow => PriceRequirement::MidPriceBelow(price_x18),
        }
    }

    /// Map a symbolic kind such as `"mid_price_below"` to its requirement.
    pub fn parse(kind: &str, price_x18: i128) -> Result<Self> {
        Ok(Self::new(kind.parse()?, price_x18))
    }

    pub fn kind(&self) -> PriceTriggerKind {
        match self {
            PriceRequirement::LastPriceAbove(_) => PriceTriggerKind::LastPriceAbove,
            PriceRequirement::LastPriceBelow(_) => PriceTriggerKind::LastPriceBelow,
            PriceRequirement::OraclePriceAbove(_) => PriceTriggerKind::OraclePriceAbove,
            PriceRequirement::OraclePriceBelow(_) => PriceTriggerKind::OraclePriceBelow,
            PriceRequirement::MidPriceAbove(_) => PriceTriggerKind::MidPriceAbove,
            PriceRequirement::MidPriceBelow(_) => PriceTriggerKind::MidPriceBelow,
        }
    }

    pub fn price_x18(&self) -> i128 {
        match *self {
            PriceRequirement::LastPriceAbove(p)
            | PriceRequirement::LastPriceBelow(p)
            | PriceRequirement::OraclePriceAbove(p)
            | PriceRequirement::OraclePriceBelow(p)
            | PriceRequirement::MidPriceAbove(p)
            | PriceRequirement::MidPriceBelow(p) => p,
        }
    }
}

/// Fire only once another order (by digest) has filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub digest: B256,
    pub on_partial_fill: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTriggerData {
    pub price_requirement: PriceRequirement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,
}

/// TWAP schedule. `amounts` are per-execution x18 sizes as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTriggerData {
    pub interval: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amounts: Option<Vec<String>>,
}

/// Serialized as `{"price_trigger": {...}}` or `{"time_trigger": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCriteria {
    PriceTrigger(PriceTriggerData),
    TimeTrigger(TimeTriggerData),
}

/// Trigger-order parameters before signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceTriggerOrderParams {
    pub product_id: u32,
    pub order: OrderParams,
    pub trigger: TriggerCriteria,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub spot_leverage: Option<bool>,
    #[serde(default)]
    pub id: Option<u64>,
}

/// A signed trigger order, ready for the trigger service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceTriggerOrder {
    pub product_id: u32,
    pub order: Order,
    pub trigger: TriggerCriteria,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_leverage: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl TryFrom<PlaceTriggerOrderParams> for PlaceTriggerOrder {
    type Error = Error;

    fn try_from(params: PlaceTriggerOrderParams) -> Result<Self> {
        let order = params.order.to_order()?;
        let signature = params
            .signature
            .ok_or_else(|| Error::encoding("Missing `signature`"))?;
        Ok(Self {
            product_id: params.product_id,
            order,
            trigger: params.trigger,
            signature,
            digest: params.digest,
            spot_leverage: params.spot_leverage,
            id: params.id,
        })
    }
}

impl PlaceTriggerOrder {
    /// Execute body: `{"place_order": {...}}`.
    pub fn to_payload(&self) -> Result<serde_json::Value> {
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(
            TxType::PlaceOrder.as_str().to_string(),
            serde_json::to_value(self)?,
        );
        Ok(serde_json::Value::Object(wrapper))
    }
}

impl ExecuteSigner {
    /// Fill a missing nonce and sign a trigger order against its product.
    pub fn sign_trigger_order(
        &self,
        mut params: PlaceTriggerOrderParams,
    ) -> Result<PlaceTriggerOrder> {
        if params.order.nonce.is_none() {
            params.order.nonce = Some(gen_order_nonce(None));
        }
        if params.signature.is_none() {
            let signed = self.sign_order(params.order.to_order()?, params.product_id)?;
            params.signature = Some(signed.signature);
            params.digest = Some(signed.digest);
        }
        debug!(
            product_id = params.product_id,
            trigger = ?params.trigger,
            "trigger order signed"
        );
        PlaceTriggerOrder::try_from(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_parse_all() {
        for kind in PriceTriggerKind::ALL {
            assert_eq!(kind.as_str().parse::<PriceTriggerKind>().unwrap(), kind);
            assert_eq!(PriceRequirement::new(kind, 1).kind(), kind);
        }
    }

    #[test]
    fn test_unsupported_kind_lists_valid_set() {
        let err = PriceRequirement::parse("price_sideways", 1).unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));

        let msg = err.to_string();
        assert!(msg.contains("Unsupported trigger_type: price_sideways"));
        for kind in PriceTriggerKind::ALL {
            assert!(msg.contains(kind.as_str()), "{msg} should list {kind}");
        }
    }

    #[test]
    fn test_price_requirement_wire_form() {
        let req =
            PriceRequirement::parse("oracle_price_below", 25_000_000_000_000_000_000_000).unwrap();
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            json!({"oracle_price_below": "25000000000000000000000"})
        );
        assert_eq!(req.price_x18(), 25_000_000_000_000_000_000_000);

        let back: PriceRequirement =
            serde_json::from_value(json!({"mid_price_above": "-3"})).unwrap();
        assert_eq!(back, PriceRequirement::MidPriceAbove(-3));
    }

    #[test]
    fn test_trigger_criteria_wire_form() {
        let price = TriggerCriteria::PriceTrigger(PriceTriggerData {
            price_requirement: PriceRequirement::LastPriceAbove(100),
            dependency: Some(Dependency {
                digest: B256::repeat_byte(0xab),
                on_partial_fill: true,
            }),
        });
        let value = serde_json::to_value(&price).unwrap();
        assert_eq!(
            value["price_trigger"]["price_requirement"]["last_price_above"],
            "100"
        );
        assert_eq!(value["price_trigger"]["dependency"]["on_partial_fill"], true);
        assert_eq!(
            value["price_trigger"]["dependency"]["digest"],
            format!("0x{}", "ab".repeat(32))
        );

        let time = TriggerCriteria::TimeTrigger(TimeTriggerData {
            interval: 60,
            amounts: None,
        });
        assert_eq!(
            serde_json::to_value(&time).unwrap(),
            json!({"time_trigger": {"interval": 60}})
        );
    }
}
