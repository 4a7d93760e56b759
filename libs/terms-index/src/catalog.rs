//! Remote asset catalog seam and its HTTP implementation.

use crate::error::{Error, Result};
use async_trait::async_trait;
use lexis_model::{ArtifactRef, AssetPointer, AssetSurrogate, ResourceId, SchemeDocument};
use std::sync::Arc;
use std::time::Duration;

/// Remote knowledge asset catalog the remote index crawls.
#[async_trait]
pub trait AssetCatalog: Send + Sync {
    /// Check that the catalog answers before crawling it.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    /// List the assets carrying the given asset type tag.
    ///
    /// A failure here means the catalog is unreachable.
    async fn list_vocabulary_assets(&self, asset_type_tag: &str) -> Result<Vec<AssetPointer>>;

    async fn describe_asset(&self, asset: &AssetPointer) -> Result<AssetSurrogate>;

    async fn fetch_artifact(
        &self,
        asset: &ResourceId,
        artifact: &ArtifactRef,
    ) -> Result<SchemeDocument>;

    /// Human readable location of the catalog.
    fn location(&self) -> String {
        "remote catalog".to_string()
    }
}

#[cfg(feature = "catalog-client")]
#[async_trait]
impl AssetCatalog for lexis_catalog_client::CatalogClient {
    async fn ping(&self) -> Result<()> {
        lexis_catalog_client::CatalogClient::ping(self)
            .await
            .map_err(|e| Error::CatalogUnavailable(e.to_string()))
    }

    async fn list_vocabulary_assets(&self, asset_type_tag: &str) -> Result<Vec<AssetPointer>> {
        lexis_catalog_client::CatalogClient::list_assets(self, asset_type_tag)
            .await
            .map_err(|e| Error::CatalogUnavailable(e.to_string()))
    }

    async fn describe_asset(&self, asset: &AssetPointer) -> Result<AssetSurrogate> {
        lexis_catalog_client::CatalogClient::get_asset_version(self, asset)
            .await
            .map_err(|e| Error::AssetIndexing {
                asset: asset.to_string(),
                reason: e.to_string(),
            })
    }

    async fn fetch_artifact(
        &self,
        asset: &ResourceId,
        artifact: &ArtifactRef,
    ) -> Result<SchemeDocument> {
        let fetched = match artifact {
            ArtifactRef::Canonical => self.get_canonical_carrier(asset).await,
            ArtifactRef::Carrier(carrier) => self.get_carrier_version(asset, carrier).await,
        };
        fetched.map_err(|e| Error::AssetIndexing {
            asset: asset.to_string(),
            reason: e.to_string(),
        })
    }

    fn location(&self) -> String {
        self.base_url().to_string()
    }
}

/// HTTP catalog at `base_url`, when the `catalog-client` feature is enabled.
pub fn default_asset_catalog(base_url: &str, timeout: Duration) -> Result<Arc<dyn AssetCatalog>> {
    #[cfg(feature = "catalog-client")]
    {
        let config = lexis_catalog_client::CatalogClientConfig {
            base_url: base_url.to_string(),
            timeout,
        };
        let client = lexis_catalog_client::CatalogClient::with_config(&config)
            .map_err(|e| Error::CatalogUnavailable(e.to_string()))?;
        Ok(Arc::new(client))
    }

    #[cfg(not(feature = "catalog-client"))]
    {
        let _ = (base_url, timeout);
        Err(Error::CatalogClientUnavailable)
    }
}

#[cfg(all(test, feature = "catalog-client"))]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_default_catalog_location() {
        let catalog = default_asset_catalog("http://localhost:8080/kar/", TIMEOUT).unwrap();
        assert_eq!(catalog.location(), "http://localhost:8080/kar");
    }

    #[test]
    fn test_default_catalog_rejects_bad_url() {
        let err = default_asset_catalog("localhost:8080", TIMEOUT).err().unwrap();
        assert!(matches!(err, Error::CatalogUnavailable(_)));
    }

    #[tokio::test]
    async fn test_ping_unreachable_catalog() {
        let catalog = default_asset_catalog("http://127.0.0.1:9", TIMEOUT).unwrap();
        let err = catalog.ping().await.unwrap_err();
        assert!(matches!(err, Error::CatalogUnavailable(_)));
    }
}
