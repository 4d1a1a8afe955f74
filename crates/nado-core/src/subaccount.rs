//! Subaccount identifiers.
//!
//! A subaccount is addressed on the wire as 32 bytes: the 20-byte owner
//! address followed by a 12-byte name, right-padded with zeros.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Error, Result};

/// Name used when none is given.
pub const DEFAULT_SUBACCOUNT_NAME: &str = "default";

const NAME_LEN: usize = 12;

/// Owner address plus subaccount name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subaccount {
    pub owner: Address,
    pub name: String,
}

impl Subaccount {
    pub fn new(owner: Address, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }

    /// The owner's "default" subaccount.
    pub fn default_for(owner: Address) -> Self {
        Self::new(owner, DEFAULT_SUBACCOUNT_NAME)
    }

    pub fn to_bytes32(&self) -> Result<B256> {
        subaccount_to_bytes32(self.owner, &self.name)
    }

    pub fn to_hex(&self) -> Result<String> {
        Ok(bytes32_to_hex(&self.to_bytes32()?))
    }
}

impl FromStr for Subaccount {
    type Err = Error;

    /// Parse a 32-byte hex sender back into owner and name.
    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex_to_bytes32(s)?;
        let owner = Address::from_slice(&bytes[..20]);
        let name_bytes: Vec<u8> = bytes[20..]
            .iter()
            .copied()
            .take_while(|b| *b != 0)
            .collect();
        let name = String::from_utf8(name_bytes)
            .map_err(|e| Error::encoding(format!("Subaccount name is not UTF-8: {e}")))?;
        Ok(Self { owner, name })
    }
}

/// Encode a subaccount name as 12 bytes, right-padded with zeros.
pub fn subaccount_name_to_bytes12(name: &str) -> Result<[u8; NAME_LEN]> {
    let raw = name.as_bytes();
    if raw.len() > NAME_LEN {
        return Err(Error::encoding(format!(
            "Subaccount name {name:?} is longer than {NAME_LEN} bytes"
        )));
    }
    let mut out = [0u8; NAME_LEN];
    out[..raw.len()].copy_from_slice(raw);
    Ok(out)
}

pub fn subaccount_to_bytes32(owner: Address, name: &str) -> Result<B256> {
    let mut out = [0u8; 32];
    out[..20].copy_from_slice(owner.as_slice());
    out[20..].copy_from_slice(&subaccount_name_to_bytes12(name)?);
    Ok(B256::from(out))
}

/// Canonical lowercase `0x`-prefixed form.
pub fn bytes32_to_hex(bytes: &B256) -> String {
    format!("0x{}", hex::encode(bytes.as_slice()))
}

/// Parse hex into 32 bytes. Shorter input is right-padded with zeros.
pub fn hex_to_bytes32(s: &str) -> Result<B256> {
    let clean = s.trim().trim_start_matches("0x");
    let raw = hex::decode(clean).map_err(|e| Error::encoding(format!("Invalid hex {s:?}: {e}")))?;
    if raw.len() > 32 {
        return Err(Error::encoding(format!(
            "Hex value {s:?} is longer than 32 bytes"
        )));
    }
    let mut out = [0u8; 32];
    out[..raw.len()].copy_from_slice(&raw);
    Ok(B256::from(out))
}

/// Re-encode a sender in canonical hex form.
pub fn normalize_sender(sender: &str) -> Result<String> {
    Ok(bytes32_to_hex(&hex_to_bytes32(sender)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "0x841fe4876763357975d60da128d8a54bb045d76a";
    const SENDER: &str = "0x841fe4876763357975d60da128d8a54bb045d76a64656661756c740000000000";

    #[test]
    fn test_default_subaccount_bytes32() {
        let owner: Address = OWNER.parse().unwrap();
        let sub = Subaccount::default_for(owner);
        assert_eq!(sub.to_hex().unwrap(), SENDER);
    }

    #[test]
    fn test_parse_sender() {
        let sub: Subaccount = SENDER.parse().unwrap();
        assert_eq!(sub.owner, OWNER.parse::<Address>().unwrap());
        assert_eq!(sub.name, "default");
    }

    #[test]
    fn test_name_too_long() {
        let owner: Address = OWNER.parse().unwrap();
        assert!(subaccount_to_bytes32(owner, "thirteen-char").is_err());
        assert!(subaccount_to_bytes32(owner, "twelve-chars").is_ok());
    }

    #[test]
    fn test_hex_to_bytes32_padding() {
        let bytes = hex_to_bytes32("0xabcd").unwrap();
        assert_eq!(bytes[0], 0xab);
        assert_eq!(bytes[1], 0xcd);
        assert!(bytes[2..].iter().all(|b| *b == 0));
        assert!(hex_to_bytes32(&format!("0x{}", "11".repeat(33))).is_err());
        assert!(hex_to_bytes32("0xzz").is_err());
    }

    #[test]
    fn test_normalize_sender() {
        let upper = SENDER.to_uppercase().replacen("0X", "0x", 1);
        assert_eq!(normalize_sender(&upper).unwrap(), SENDER);
        assert_eq!(normalize_sender(SENDER.trim_start_matches("0x")).unwrap(), SENDER);
    }
}
