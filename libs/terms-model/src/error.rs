//! Error types for the vocabulary model

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Malformed version tag '{0}': expected yyyyMMdd with an optional -<digits> suffix")]
    MalformedVersionTag(String),

    #[error("Invalid scheme descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
