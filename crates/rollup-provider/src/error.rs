//! Provider error types.

use rollup_transport::TransportError;
use rollup_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid {method} response: {reason}")]
    Decode { method: String, reason: String },

    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),

    #[error("Ethereum network {0} is not supported")]
    UnsupportedNetwork(String),

    #[error("Transport {0} is not supported")]
    UnsupportedTransport(String),

    #[error("Token error: {0}")]
    Types(#[from] TypesError),

    #[error("Chain client error: {0}")]
    Chain(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
