//! Primary and linked signer identities.
//!
//! A linked signer is a secondary key registered on a subaccount through a
//! `link_signer` execute. Once linked it signs executes on the subaccount's
//! behalf, so it is preferred over the primary key whenever present.

use alloy_primitives::{Address, B256};
use alloy_signer_local::PrivateKeySigner;
use anyhow::{bail, Context, Result};
use nado_core::config::Config;
use nado_core::signing::ExecuteSigner;
use nado_core::subaccount::subaccount_to_bytes32;
use nado_core::tx::LinkSigner;
use tracing::{debug, info};

use crate::wallet::{TradingWallet, SIGNER_PRIVATE_KEY_VAR};

/// Environment variable holding the optional linked signer key.
pub const LINKED_SIGNER_PRIVATE_KEY_VAR: &str = "NADO_LINKED_SIGNER_PRIVATE_KEY";

/// The primary wallet plus an optional linked signer.
#[derive(Clone, Debug)]
pub struct LinkedSigners {
    primary: TradingWallet,
    linked: Option<TradingWallet>,
}

impl LinkedSigners {
    pub fn new(primary: TradingWallet, linked: Option<TradingWallet>) -> Self {
        Self { primary, linked }
    }

    /// Load from `NADO_SIGNER_PRIVATE_KEY` and the optional
    /// `NADO_LINKED_SIGNER_PRIVATE_KEY`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let primary = std::env::var(SIGNER_PRIVATE_KEY_VAR).ok();
        let linked = std::env::var(LINKED_SIGNER_PRIVATE_KEY_VAR).ok();
        Self::from_keys(primary.as_deref(), linked.as_deref())
    }

    /// Build from hex keys. A linked key without a primary key is rejected.
    pub fn from_keys(primary: Option<&str>, linked: Option<&str>) -> Result<Self> {
        let primary = match (primary, linked) {
            (Some(primary), _) => primary,
            (None, Some(_)) => bail!("linked signer cannot be set if signer is not set"),
            (None, None) => bail!("{SIGNER_PRIVATE_KEY_VAR} is not set"),
        };

        let primary = TradingWallet::from_private_key(primary).context("Invalid signer key")?;
        let linked = linked
            .map(TradingWallet::from_private_key)
            .transpose()
            .context("Invalid linked signer key")?;

        info!(
            signer = %primary.address(),
            linked = ?linked.as_ref().map(TradingWallet::address),
            "signers loaded"
        );

        Ok(Self { primary, linked })
    }

    pub fn primary(&self) -> &TradingWallet {
        &self.primary
    }

    pub fn linked(&self) -> Option<&TradingWallet> {
        self.linked.as_ref()
    }

    /// The wallet that signs executes: the linked signer if set.
    pub fn active(&self) -> &TradingWallet {
        self.linked.as_ref().unwrap_or(&self.primary)
    }

    /// Address owning the subaccounts, always the primary wallet.
    pub fn owner(&self) -> Address {
        self.primary.address()
    }

    /// An execute signer bound to the active wallet.
    pub fn execute_signer(&self, config: Config) -> ExecuteSigner {
        let active = self.active();
        debug!(signer = %active.address(), "execute signer created");
        ExecuteSigner::new(active.signer().clone(), config)
    }

    /// The `link_signer` record registering the linked wallet on `sender`.
    ///
    /// Must be signed by the primary wallet.
    pub fn link_signer_tx(&self, sender: B256, nonce: u64) -> Result<LinkSigner> {
        let linked = self
            .linked
            .as_ref()
            .context("No linked signer configured")?;
        let signer = subaccount_to_bytes32(linked.address(), "")?;
        Ok(LinkSigner {
            sender,
            signer,
            nonce,
        })
    }

    /// A signer over the primary key alone, for `link_signer` itself.
    pub fn primary_signer(&self) -> PrivateKeySigner {
        self.primary.signer().clone()
    }
}
