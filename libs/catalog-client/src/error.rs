//! Error types for catalog-client

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Catalog client errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Catalog returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}
