//! Signer identities for Nado
//!
//! Loads the primary trading wallet and an optional linked signer, and binds
//! the active one to an [`nado_core::signing::ExecuteSigner`].

pub mod linked;
pub mod wallet;

pub use linked::{LinkedSigners, LINKED_SIGNER_PRIVATE_KEY_VAR};
pub use wallet::{TradingWallet, SIGNER_PRIVATE_KEY_VAR};
