//! Knowledge asset catalog API client

use crate::error::{Error, Result};
use lexis_model::{AssetPointer, AssetSurrogate, ResourceId, SchemeDocument};
use reqwest::{Client, StatusCode};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/kar";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a [`CatalogClient`].
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Client for a remote knowledge asset catalog and repository.
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client with default timeout against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(&CatalogClientConfig {
            base_url: base_url.into(),
            ..CatalogClientConfig::default()
        })
    }

    pub fn with_config(config: &CatalogClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::InvalidUrl(config.base_url.clone()));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the catalog answers at all.
    pub async fn ping(&self) -> Result<()> {
        let url = self.catalog_url();
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(())
    }

    /// List the assets of a given asset type.
    pub async fn list_assets(&self, asset_type_tag: &str) -> Result<Vec<AssetPointer>> {
        let url = self.assets_url(asset_type_tag);
        tracing::debug!(url = %url, "Listing catalog assets");
        self.get_json(&url, || asset_type_tag.to_string()).await
    }

    /// Fetch the catalog metadata of one asset version.
    pub async fn get_asset_version(&self, asset: &AssetPointer) -> Result<AssetSurrogate> {
        let url = self.asset_version_url(asset);
        self.get_json(&url, || asset.to_string()).await
    }

    /// Fetch and parse the canonical carrier of an asset version.
    pub async fn get_canonical_carrier(&self, asset: &ResourceId) -> Result<SchemeDocument> {
        let url = format!("{}/carrier", self.asset_version_url(asset));
        self.get_json(&url, || asset.to_string()).await
    }

    /// Fetch and parse one specific carrier artifact of an asset version.
    pub async fn get_carrier_version(
        &self,
        asset: &ResourceId,
        artifact: &ResourceId,
    ) -> Result<SchemeDocument> {
        let url = format!(
            "{}/carriers/{}/versions/{}",
            self.asset_version_url(asset),
            artifact.uuid,
            urlencoding::encode(&artifact.version_tag)
        );
        self.get_json(&url, || format!("{} carrier {}", asset, artifact))
            .await
    }

    async fn get_json<T, F>(&self, url: &str, describe: F) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        F: FnOnce() -> String,
    {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::AssetNotFound(describe()));
        }
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn catalog_url(&self) -> String {
        format!("{}/cat", self.base_url)
    }

    fn assets_url(&self, asset_type_tag: &str) -> String {
        format!(
            "{}/assets?assetTypeTag={}",
            self.catalog_url(),
            urlencoding::encode(asset_type_tag)
        )
    }

    fn asset_version_url(&self, asset: &ResourceId) -> String {
        format!(
            "{}/assets/{}/versions/{}",
            self.catalog_url(),
            asset.uuid,
            urlencoding::encode(&asset.version_tag)
        )
    }
}
