//! Error types for the Nado protocol core.
//!
//! Every error raised here stems from caller input rather than a transient
//! failure, so nothing in this crate retries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid appendix combination, TWAP parameter, custom amount list, or a
    /// typed-data value that does not match its declared wire type.
    #[error("Encoding error: {message}")]
    Encoding { message: String },

    /// Unknown transaction kind or trigger kind.
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// Chain id, endpoint address or signer was not configured.
    #[error("Missing configuration: {message}")]
    MissingConfig { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Signing error: {message}")]
    Signing { message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),
}

impl Error {
    pub(crate) fn encoding(message: impl Into<String>) -> Self {
        Error::Encoding {
            message: message.into(),
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Error::Schema {
            message: message.into(),
        }
    }

    pub(crate) fn missing_config(message: impl Into<String>) -> Self {
        Error::MissingConfig {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    pub(crate) fn signing(message: impl Into<String>) -> Self {
        Error::Signing {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
