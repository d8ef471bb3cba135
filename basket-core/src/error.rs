//! Error types for the Basket Terminal

use thiserror::Error;

/// Workspace-wide error type
///
/// Variants map onto the retry semantics callers care about: `Validation`
/// and `NotFound` are caller mistakes, `Config` is fatal until the process
/// is reconfigured, `Api`/`Network` are transport failures for the current
/// operation only.
#[derive(Error, Debug)]
pub enum BasketError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BasketError {
    pub fn validation(msg: impl Into<String>) -> Self {
        BasketError::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        BasketError::Config(msg.into())
    }

    pub fn api(msg: impl Into<String>) -> Self {
        BasketError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        BasketError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        BasketError::Parse(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        BasketError::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        BasketError::Internal(msg.into())
    }
}

/// Result type alias for basket operations
pub type BasketResult<T> = Result<T, BasketError>;
