//! EIP-712 typed data for Nado transactions.
//!
//! # Architecture
//!
//! ```text
//! TxType ── schema() ──► TxSchema
//!    │                      │
//!    ▼                      ▼
//! NadoMessage ──► build_typed_data ──► TypedData ──► signing::digest / sign
//! ```

pub mod domain;
pub mod typed_data;
pub mod types;

pub use domain::{
    address_to_hex, eip712_domain_type, gen_order_verifying_contract, Eip712Domain,
    NADO_DOMAIN_NAME, NADO_DOMAIN_VERSION,
};
pub use typed_data::{build_typed_data, TypedData, Types};
pub use types::{schema_for, Eip712Field, TxSchema, TxType};
