//! Nado Core Library
//!
//! Order appendix codec, transaction registry, EIP-712 typed data and the
//! signing engine for the Nado exchange.

pub mod appendix;
pub mod config;
pub mod eip712;
pub mod error;
pub mod expiration;
pub mod math;
pub mod nonce;
pub mod orders;
pub mod request;
pub mod signing;
pub mod subaccount;
pub mod tx;

pub use error::{Error, Result};
