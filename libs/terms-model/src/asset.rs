//! Knowledge asset descriptors exchanged with a remote asset catalog.

use crate::scheme::SchemeKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Versioned identifier of an asset or artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub uuid: Uuid,
    pub version_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ResourceId {
    pub fn new(uuid: Uuid, version_tag: impl Into<String>) -> Self {
        Self {
            uuid,
            version_tag: version_tag.into(),
            tag: None,
            name: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn key(&self) -> SchemeKey {
        SchemeKey::new(self.uuid, self.version_tag.clone())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.uuid, self.version_tag)
    }
}

/// Catalog listing entry.
pub type AssetPointer = ResourceId;

/// Catalog metadata of one asset version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSurrogate {
    pub asset_id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Date-versioned taxonomy identifiers of the asset.
    #[serde(default)]
    pub secondary_ids: Vec<ResourceId>,
    /// Artifact identifiers of the carriers holding the asset's content.
    #[serde(default)]
    pub carriers: Vec<ResourceId>,
}

impl AssetSurrogate {
    /// The identifier a scheme built from this asset is keyed under.
    pub fn scheme_id(&self) -> &ResourceId {
        self.secondary_ids.first().unwrap_or(&self.asset_id)
    }
}

/// Which artifact of an asset to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactRef {
    /// The asset's canonical carrier.
    Canonical,
    /// A specific carrier artifact.
    Carrier(ResourceId),
}
