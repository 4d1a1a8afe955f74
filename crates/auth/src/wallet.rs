//! Trading wallet management for Nado order signing.
//!
//! Provides wallet loading from environment variables and typed-data
//! signing on behalf of the wallet's subaccounts.

use alloy_primitives::{Address, B256};
use alloy_signer_local::PrivateKeySigner;
use anyhow::{Context, Result};
use nado_core::eip712::TypedData;
use nado_core::signing::{sign_typed_data, signature_to_hex};
use nado_core::subaccount::Subaccount;
use std::str::FromStr;

/// Environment variable holding the primary signer key.
pub const SIGNER_PRIVATE_KEY_VAR: &str = "NADO_SIGNER_PRIVATE_KEY";

/// A trading wallet with private key access for signing executes.
///
/// The wallet can be loaded from an environment variable or directly
/// from a hex-encoded private key.
#[derive(Clone)]
pub struct TradingWallet {
    signer: PrivateKeySigner,
    address: Address,
}

impl TradingWallet {
    /// Load wallet from the `NADO_SIGNER_PRIVATE_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set or
    /// if the private key format is invalid.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let private_key = std::env::var(SIGNER_PRIVATE_KEY_VAR)
            .with_context(|| format!("{SIGNER_PRIVATE_KEY_VAR} environment variable not set"))?;

        Self::from_private_key(&private_key)
    }

    /// Create a wallet from a hex-encoded private key.
    ///
    /// # Arguments
    ///
    /// * `key` - A 64-character hex string, optionally prefixed with "0x"
    pub fn from_private_key(key: &str) -> Result<Self> {
        let key_clean = key.trim().trim_start_matches("0x");

        let signer = PrivateKeySigner::from_str(key_clean)
            .context("Invalid private key format - expected 64 hex characters")?;

        let address = signer.address();

        Ok(Self { signer, address })
    }

    /// Get the wallet's Ethereum address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the wallet address as a checksummed hex string.
    pub fn address_string(&self) -> String {
        format!("{}", self.address)
    }

    /// The wallet's subaccount called `name`.
    pub fn subaccount(&self, name: &str) -> Subaccount {
        Subaccount::new(self.address, name)
    }

    /// bytes32 sender for the wallet's subaccount called `name`.
    pub fn sender(&self, name: &str) -> Result<B256> {
        self.subaccount(name)
            .to_bytes32()
            .with_context(|| format!("Invalid subaccount name {name:?}"))
    }

    /// Get a reference to the underlying signer.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Consume the wallet and return the signer.
    pub fn into_signer(self) -> PrivateKeySigner {
        self.signer
    }

    /// Sign typed data and return the signature as 0x hex.
    pub fn sign_typed_data_hex(&self, typed_data: &TypedData) -> Result<String> {
        let signature = sign_typed_data(typed_data, &self.signer)
            .with_context(|| format!("Failed to sign {}", typed_data.primary_type))?;
        Ok(signature_to_hex(&signature))
    }
}

impl std::fmt::Debug for TradingWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the private key in debug output
        f.debug_struct("TradingWallet")
            .field("address", &self.address_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nado_core::eip712::{build_typed_data, TxType};
    use nado_core::signing::{signature_from_hex, verify_typed_data};
    use nado_core::subaccount::bytes32_to_hex;
    use serde_json::json;

    // Test private key (DO NOT USE IN PRODUCTION - this is a well-known test key)
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_from_private_key_with_prefix() {
        let wallet = TradingWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(wallet.address_string(), TEST_ADDRESS);
    }

    #[test]
    fn test_from_private_key_without_prefix() {
        let key_no_prefix = TEST_PRIVATE_KEY.trim_start_matches("0x");
        let wallet = TradingWallet::from_private_key(key_no_prefix).unwrap();
        assert_eq!(
            wallet.address_string().to_lowercase(),
            TEST_ADDRESS.to_lowercase()
        );
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(TradingWallet::from_private_key("not-a-valid-key").is_err());
        assert!(TradingWallet::from_private_key("0x1234").is_err());
    }

    #[test]
    fn test_debug_does_not_expose_key() {
        let wallet = TradingWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let debug_str = format!("{:?}", wallet);

        assert!(debug_str.contains("TradingWallet"));
        assert!(debug_str.contains("address"));
        assert!(!debug_str.contains("ac0974bec39a17e36ba4a6b4d238ff944bacb478"));
    }

    #[test]
    fn test_sender_for_subaccount() {
        let wallet = TradingWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let sender = wallet.sender("default").unwrap();
        assert_eq!(
            bytes32_to_hex(&sender),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb9226664656661756c740000000000"
        );
        assert!(wallet.sender("a-name-longer-than-twelve").is_err());
    }

    #[test]
    fn test_sign_typed_data_hex() {
        let wallet = TradingWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let sender = bytes32_to_hex(&wallet.sender("default").unwrap());
        let message = json!({"sender": sender, "expiration": "1700000000"});
        let td = build_typed_data(
            TxType::AuthenticateStream,
            message.as_object().unwrap().clone(),
            Address::repeat_byte(0x01),
            1,
        );

        let sig_hex = wallet.sign_typed_data_hex(&td).unwrap();
        assert!(sig_hex.starts_with("0x"));
        assert_eq!(sig_hex.len(), 132);

        let signature = signature_from_hex(&sig_hex).unwrap();
        assert!(verify_typed_data(&td, &signature, wallet.address()).unwrap());
    }
}
