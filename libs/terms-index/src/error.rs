//! Error types for the concept indices

use lexis_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Concept source not found: {0}")]
    SourceNotFound(String),

    #[error("Concept source error: {0}")]
    Source(String),

    #[error("Invalid scheme descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Malformed version tag: {0}")]
    MalformedVersionTag(String),

    #[error("Asset catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Failed to index asset {asset}: {reason}")]
    AssetIndexing { asset: String, reason: String },

    #[error("No asset catalog configured (enable `catalog-client` feature or pass a catalog)")]
    CatalogClientUnavailable,

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::MalformedVersionTag(tag) => Error::MalformedVersionTag(tag),
            ModelError::InvalidDescriptor(msg) => Error::InvalidDescriptor(msg),
            ModelError::SerializationError(e) => Error::JsonError(e),
            ModelError::Io(e) => Error::IoError(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
