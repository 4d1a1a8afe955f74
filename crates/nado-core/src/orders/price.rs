//! Price-trigger order construction.

use alloy_primitives::B256;
use tracing::debug;

use super::trigger::{
    Dependency, PlaceTriggerOrderParams, PriceRequirement, PriceTriggerData, TriggerCriteria,
};
use crate::appendix::{AppendixBuilder, TriggerType};
use crate::expiration::{now_secs, OrderType, PRICE_TRIGGER_DEFAULT_EXPIRATION_SECS};
use crate::request::OrderParams;
use crate::Result;

/// Builder for orders that go live once a price condition holds.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTriggerOrderBuilder {
    product_id: u32,
    sender: B256,
    price_x18: i128,
    amount_x18: i128,
    requirement: PriceRequirement,
    order_type: OrderType,
    reduce_only: bool,
    isolated_margin: Option<u128>,
    expiration: Option<u64>,
    nonce: Option<u64>,
    spot_leverage: Option<bool>,
    id: Option<u64>,
    dependency: Option<Dependency>,
}

impl PriceTriggerOrderBuilder {
    pub fn new(
        product_id: u32,
        sender: B256,
        price_x18: i128,
        amount_x18: i128,
        requirement: PriceRequirement,
    ) -> Self {
        Self {
            product_id,
            sender,
            price_x18,
            amount_x18,
            requirement,
            order_type: OrderType::Default,
            reduce_only: false,
            isolated_margin: None,
            expiration: None,
            nonce: None,
            spot_leverage: None,
            id: None,
            dependency: None,
        }
    }

    /// Like [`new`](Self::new) with a symbolic kind such as `"last_price_above"`.
    pub fn with_kind(
        product_id: u32,
        sender: B256,
        price_x18: i128,
        amount_x18: i128,
        kind: &str,
        trigger_price_x18: i128,
    ) -> Result<Self> {
        let requirement = PriceRequirement::parse(kind, trigger_price_x18)?;
        Ok(Self::new(product_id, sender, price_x18, amount_x18, requirement))
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = order_type;
        self
    }

    pub fn reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = reduce_only;
        self
    }

    /// Place the triggered order with isolated margin.
    pub fn isolated_margin(mut self, margin_x18: u128) -> Self {
        self.isolated_margin = Some(margin_x18);
        self
    }

    pub fn expiration(mut self, expiration: u64) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn spot_leverage(mut self, spot_leverage: bool) -> Self {
        self.spot_leverage = Some(spot_leverage);
        self
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Fire only after the order with `digest` fills.
    pub fn dependency(mut self, digest: B256, on_partial_fill: bool) -> Self {
        self.dependency = Some(Dependency {
            digest,
            on_partial_fill,
        });
        self
    }

    pub fn build(&self) -> Result<PlaceTriggerOrderParams> {
        self.build_at(now_secs())
    }

    /// Build with the 7-day default expiration counted from `now`.
    pub fn build_at(&self, now: u64) -> Result<PlaceTriggerOrderParams> {
        let mut appendix = AppendixBuilder::new(self.order_type)
            .reduce_only(self.reduce_only)
            .trigger_type(TriggerType::Price);
        if let Some(margin) = self.isolated_margin {
            appendix = appendix.isolated_margin(margin);
        }
        let appendix = appendix.build()?;

        let expiration = self
            .expiration
            .unwrap_or(now.saturating_add(PRICE_TRIGGER_DEFAULT_EXPIRATION_SECS));

        debug!(
            product_id = self.product_id,
            kind = %self.requirement.kind(),
            appendix = %appendix,
            "price trigger order built"
        );

        Ok(PlaceTriggerOrderParams {
            product_id: self.product_id,
            order: OrderParams {
                sender: self.sender,
                price_x18: self.price_x18,
                amount: self.amount_x18,
                expiration,
                nonce: self.nonce,
                appendix,
            },
            trigger: TriggerCriteria::PriceTrigger(PriceTriggerData {
                price_requirement: self.requirement,
                dependency: self.dependency,
            }),
            signature: None,
            digest: None,
            spot_leverage: self.spot_leverage,
            id: self.id,
        })
    }
}
