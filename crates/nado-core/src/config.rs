//! Signing configuration for Nado executes.

use alloy_primitives::Address;
use serde::Deserialize;
use std::env;

use crate::{Error, Result};

/// Chain and contract context needed to sign executes.
///
/// Both values are optional so a config can be loaded before the deployment
/// is known; signing fails with [`Error::MissingConfig`] until they are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub chain_id: Option<u64>,
    pub endpoint_addr: Option<Address>,
}

impl Config {
    pub fn new(chain_id: u64, endpoint_addr: Address) -> Self {
        Self {
            chain_id: Some(chain_id),
            endpoint_addr: Some(endpoint_addr),
        }
    }

    /// Load configuration from `NADO_CHAIN_ID` and `NADO_ENDPOINT_ADDR`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let chain_id = match env::var("NADO_CHAIN_ID") {
            Ok(raw) => Some(raw.trim().parse().map_err(|_| {
                Error::config(format!("NADO_CHAIN_ID is not a valid chain id: {raw}"))
            })?),
            Err(_) => None,
        };

        let endpoint_addr = match env::var("NADO_ENDPOINT_ADDR") {
            Ok(raw) => Some(raw.trim().parse().map_err(|_| {
                Error::config(format!("NADO_ENDPOINT_ADDR is not a valid address: {raw}"))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            chain_id,
            endpoint_addr,
        })
    }

    /// Load configuration from a file (any format the `config` crate
    /// understands), with `NADO_*` environment variables taking precedence.
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("NADO").try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn chain_id(&self) -> Result<u64> {
        self.chain_id
            .ok_or_else(|| Error::missing_config("chain_id is not configured"))
    }

    pub fn endpoint_addr(&self) -> Result<Address> {
        self.endpoint_addr
            .ok_or_else(|| Error::missing_config("endpoint_addr is not configured"))
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_endpoint_addr(mut self, endpoint_addr: Address) -> Self {
        self.endpoint_addr = Some(endpoint_addr);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values() {
        let config = Config::default();
        assert!(matches!(config.chain_id(), Err(Error::MissingConfig { .. })));
        assert!(matches!(
            config.endpoint_addr(),
            Err(Error::MissingConfig { .. })
        ));
    }

    #[test]
    fn test_builder_methods() {
        let endpoint = Address::repeat_byte(0x22);
        let config = Config::default()
            .with_chain_id(763373)
            .with_endpoint_addr(endpoint);
        assert_eq!(config, Config::new(763373, endpoint));
        assert_eq!(config.chain_id().unwrap(), 763373);
        assert_eq!(config.endpoint_addr().unwrap(), endpoint);
    }

    #[test]
    fn test_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("nado-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("nado.toml");
        std::fs::write(
            &path,
            "chain_id = 31337\nendpoint_addr = \"0x2279b7a0a67db372996a5fab50d91eaa73d2ebe6\"\n",
        )
        .unwrap();

        let config = Config::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.chain_id, Some(31337));
        assert_eq!(
            config.endpoint_addr,
            Some("0x2279b7a0a67db372996a5fab50d91eaa73d2ebe6".parse().unwrap())
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
