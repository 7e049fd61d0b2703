use thiserror::Error;

/// Errors raised while validating identifiers and configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("invalid scope name: {0:?}")]
    InvalidScopeName(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why a stored `message` value could not be turned into a [`crate::ParsedMessage`].
#[derive(Debug, Error)]
pub enum MessageParseError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("message is {0}, expected a JSON object")]
    NotAnObject(&'static str),
}
