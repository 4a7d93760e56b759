//! Scheme manifest consumed by the static index.
//!
//! The manifest is a JSON array with one record per scheme version:
//!
//! ```json
//! [{ "sourceRef": "lexis.vocabs.KnowledgeAssetType",
//!    "schemeUuid": "243089c1-b6ab-318f-bec9-e1cfaf410992",
//!    "versionTag": "20190801",
//!    "tag": "KnowledgeAssetType",
//!    "seriesUri": "https://example.org/taxonomy/KnowledgeAssetType" }]
//! ```

use crate::error::{ModelError, Result};
use crate::identity::version_uri;
use crate::scheme::{SchemeHeader, SchemeKey};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeDescriptor {
    /// Opaque reference understood by the concept source registry.
    pub source_ref: String,
    pub scheme_uuid: Uuid,
    pub version_tag: String,
    pub tag: String,
    pub series_uri: String,
}

impl SchemeDescriptor {
    pub fn key(&self) -> SchemeKey {
        SchemeKey::new(self.scheme_uuid, self.version_tag.clone())
    }

    pub fn header(&self) -> SchemeHeader {
        SchemeHeader {
            key: self.key(),
            tag: self.tag.clone(),
            name: self.source_ref.clone(),
            series_uri: self.series_uri.clone(),
            version_uri: version_uri(&self.series_uri, &self.version_tag),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source_ref.trim().is_empty() {
            return Err(ModelError::InvalidDescriptor(format!(
                "scheme {} has an empty sourceRef",
                self.key()
            )));
        }
        if self.version_tag.trim().is_empty() {
            return Err(ModelError::InvalidDescriptor(format!(
                "scheme {} ({}) has an empty versionTag",
                self.scheme_uuid, self.source_ref
            )));
        }
        Ok(())
    }
}

/// Parse a manifest from JSON bytes.
pub fn parse_manifest(bytes: &[u8]) -> Result<Vec<SchemeDescriptor>> {
    let descriptors: Vec<SchemeDescriptor> = serde_json::from_slice(bytes)?;
    for descriptor in &descriptors {
        descriptor.validate()?;
    }
    Ok(descriptors)
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<Vec<SchemeDescriptor>> {
    let bytes = fs::read(path)?;
    parse_manifest(&bytes)
}
