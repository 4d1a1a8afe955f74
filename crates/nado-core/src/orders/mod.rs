//! Appendix-aware order builders.
//!
//! TWAP and price-trigger orders are ordinary signed orders whose appendix
//! marks the trigger kind; the trigger criteria are sent alongside.

pub mod price;
pub mod trigger;
pub mod twap;

pub use price::PriceTriggerOrderBuilder;
pub use trigger::{
    Dependency, PlaceTriggerOrder, PlaceTriggerOrderParams, PriceRequirement, PriceTriggerData,
    PriceTriggerKind, TimeTriggerData, TriggerCriteria,
};
pub use twap::{
    calculate_equal_amounts, create_twap_order, estimate_twap_completion_time,
    validate_twap_order, TwapOrderBuilder, TWAP_MAX_TIMES, TWAP_MIN_TIMES,
};
