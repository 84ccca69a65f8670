//! Error types for SoftLayer API operations.

use crate::mask::MaskSyntaxError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Object mask syntax error: {0}")]
    MaskSyntax(#[from] MaskSyntaxError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API fault {code}: {message}")]
    Fault { code: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
