//! Nado SDK
//!
//! This is the root crate that provides benchmark and integration-test access
//! to the member crates. For actual functionality, use them directly:
//!
//! - `nado-core`: appendix codec, transaction schemas, typed data, signing,
//!   trigger order builders
//! - `auth`: primary and linked signer identities

pub use auth;
pub use nado_core as core;
