#![allow(dead_code)]

use async_trait::async_trait;
use lexis_index::{AssetCatalog, Error, InMemoryConceptRegistry, Result};
use lexis_model::{
    name_uuid, ArtifactRef, AssetPointer, AssetSurrogate, ConceptTerm, ResourceId,
    SchemeDescriptor, SchemeDocument,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

pub const SERIES: &str = "https://example.org/taxonomy/KnowledgeAssetType";
pub const SOURCE_REF: &str = "lexis.vocabs.KnowledgeAssetType";

// ---------------------------------------------------------------------------
// Static fixtures
// ---------------------------------------------------------------------------

pub fn scheme_uuid() -> Uuid {
    name_uuid(SERIES)
}

pub fn descriptor(version: &str, source_ref: &str) -> SchemeDescriptor {
    SchemeDescriptor {
        source_ref: source_ref.to_string(),
        scheme_uuid: scheme_uuid(),
        version_tag: version.to_string(),
        tag: "KnowledgeAssetType".to_string(),
        series_uri: SERIES.to_string(),
    }
}

pub fn term(uuid: Uuid, tag: &str, ancestors: &[Uuid]) -> ConceptTerm {
    ConceptTerm::new(
        uuid,
        tag,
        tag.to_lowercase(),
        format!("{}#{}", SERIES, uuid),
    )
    .with_ancestors(ancestors.iter().copied())
}

pub fn registry(sources: &[(&str, Vec<ConceptTerm>)]) -> InMemoryConceptRegistry {
    sources
        .iter()
        .fold(InMemoryConceptRegistry::new(), |registry, (source_ref, terms)| {
            registry.with_source(*source_ref, terms.clone())
        })
}

// ---------------------------------------------------------------------------
// Remote fixtures
// ---------------------------------------------------------------------------

pub fn document(series: &str, version: &str, concepts: Value) -> SchemeDocument {
    serde_json::from_value(json!({
        "resourceType": "CodeSystem",
        "url": series,
        "version": version,
        "name": series.rsplit('/').next().unwrap_or(series),
        "concept": concepts,
    }))
    .expect("valid scheme document")
}

/// A vocabulary asset as served by [`ScriptedCatalog`].
#[derive(Debug, Clone)]
pub struct FakeAsset {
    pub surrogate: AssetSurrogate,
    pub canonical: Option<SchemeDocument>,
    pub carriers: HashMap<Uuid, SchemeDocument>,
}

impl FakeAsset {
    pub fn single(series: &str, version: &str, tag: &str, doc: SchemeDocument) -> Self {
        let carrier = ResourceId::new(name_uuid(&format!("{}/carrier", series)), "1.0.0");
        let mut asset = Self::bare(series, version, tag);
        asset.surrogate.carriers.push(carrier.clone());
        asset.carriers.insert(carrier.uuid, doc.clone());
        asset.canonical = Some(doc);
        asset
    }

    pub fn multi(series: &str, version: &str, tag: &str, docs: Vec<SchemeDocument>) -> Self {
        let mut asset = Self::bare(series, version, tag);
        for (idx, doc) in docs.into_iter().enumerate() {
            let carrier =
                ResourceId::new(name_uuid(&format!("{}/carrier/{}", series, idx)), "1.0.0");
            asset.surrogate.carriers.push(carrier.clone());
            asset.carriers.insert(carrier.uuid, doc);
        }
        asset
    }

    pub fn bare(series: &str, version: &str, tag: &str) -> Self {
        let asset_id = ResourceId::new(name_uuid(&format!("{}/asset", series)), "1.0.0");
        let secondary = ResourceId::new(name_uuid(series), version).with_tag(tag);
        Self {
            surrogate: AssetSurrogate {
                asset_id,
                name: Some(tag.to_string()),
                secondary_ids: vec![secondary],
                carriers: Vec::new(),
            },
            canonical: None,
            carriers: HashMap::new(),
        }
    }

    pub fn without_secondary_id(mut self) -> Self {
        self.surrogate.secondary_ids.clear();
        self
    }

    pub fn pointer(&self) -> AssetPointer {
        self.surrogate.asset_id.clone()
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    assets: Vec<FakeAsset>,
    unreachable: bool,
    broken: HashSet<Uuid>,
}

/// In-memory asset catalog whose content and failures are scripted by the test.
#[derive(Debug, Default)]
pub struct ScriptedCatalog {
    state: Mutex<CatalogState>,
    fetch_delay: Option<Duration>,
    pub fetches: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn new(assets: Vec<FakeAsset>) -> Self {
        let catalog = Self::default();
        catalog.set_assets(assets);
        catalog
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn set_assets(&self, assets: Vec<FakeAsset>) {
        self.state.lock().unwrap().assets = assets;
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().unreachable = unreachable;
    }

    /// Make every artifact fetch of the asset fail as unparsable.
    pub fn break_asset(&self, asset: &FakeAsset) {
        self.state
            .lock()
            .unwrap()
            .broken
            .insert(asset.surrogate.asset_id.uuid);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn find(&self, asset: &ResourceId) -> Option<FakeAsset> {
        self.state
            .lock()
            .unwrap()
            .assets
            .iter()
            .find(|a| a.surrogate.asset_id == *asset)
            .cloned()
    }
}

#[async_trait]
impl AssetCatalog for ScriptedCatalog {
    async fn list_vocabulary_assets(&self, _asset_type_tag: &str) -> Result<Vec<AssetPointer>> {
        let state = self.state.lock().unwrap();
        if state.unreachable {
            return Err(Error::CatalogUnavailable("connection refused".to_string()));
        }
        Ok(state.assets.iter().map(FakeAsset::pointer).collect())
    }

    async fn describe_asset(&self, asset: &AssetPointer) -> Result<AssetSurrogate> {
        self.find(asset)
            .map(|a| a.surrogate)
            .ok_or_else(|| Error::AssetIndexing {
                asset: asset.to_string(),
                reason: "not found".to_string(),
            })
    }

    async fn fetch_artifact(
        &self,
        asset: &ResourceId,
        artifact: &ArtifactRef,
    ) -> Result<SchemeDocument> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }

        let failure = |reason: &str| Error::AssetIndexing {
            asset: asset.to_string(),
            reason: reason.to_string(),
        };
        let fake = self.find(asset).ok_or_else(|| failure("not found"))?;
        if self.state.lock().unwrap().broken.contains(&asset.uuid) {
            return Err(failure("unparsable carrier"));
        }
        match artifact {
            ArtifactRef::Canonical => fake.canonical.ok_or_else(|| failure("no canonical carrier")),
            ArtifactRef::Carrier(carrier) => fake
                .carriers
                .get(&carrier.uuid)
                .cloned()
                .ok_or_else(|| failure("unknown carrier")),
        }
    }

    fn location(&self) -> String {
        "scripted".to_string()
    }
}
