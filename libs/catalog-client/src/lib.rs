//! Knowledge Asset Catalog Client
//!
//! Async client for a remote knowledge asset catalog: lists vocabulary assets,
//! describes asset versions and fetches their scheme documents.
//!
//! # Examples
//!
//! ```rust,no_run
//! use lexis_catalog_client::CatalogClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CatalogClient::new("http://localhost:8080/kar")?;
//! for pointer in client.list_assets("Lexicon").await? {
//!     let surrogate = client.get_asset_version(&pointer).await?;
//!     println!("{:?}", surrogate.name);
//! }
//! # Ok(())
//! # }
//! ```
pub mod client;
pub mod error;

pub use client::{CatalogClient, CatalogClientConfig};
pub use error::{Error, Result};
