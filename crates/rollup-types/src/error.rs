//! Error types for rollup-types.

use thiserror::Error;

/// Domain type errors.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("Token {0} is not supported")]
    TokenNotSupported(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// Result type alias for domain type operations.
pub type TypesResult<T> = std::result::Result<T, TypesError>;
