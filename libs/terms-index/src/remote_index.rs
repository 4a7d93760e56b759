//! Index rebuilt on demand from a remote asset catalog.
//!
//! # Concurrency
//!
//! * Readers load the published snapshot through an [`ArcSwap`] and never block.
//! * [`RemoteRepositoryIndex::reindex`] assembles a complete snapshot in private
//!   scratch storage and publishes it with a single store. Concurrent reindex
//!   calls are serialized.
//!
//! # Failure modes
//!
//! * Catalog unreachable: the rebuild is abandoned, the published snapshot is
//!   kept and, when [`RemoteIndexConfig::offline_when_unreachable`] is set, the
//!   index reports `Unsupported` until the next successful reindex.
//! * Asset description, fetch or parse failure: the rebuild is abandoned and
//!   readers keep seeing exactly what they saw before.

use crate::catalog::AssetCatalog;
use crate::convert::{build_scheme, document_terms};
use crate::error::{Error, Result};
use crate::resolver::{ReindexReport, Reindexable, ResolverKind, TermsResolver};
use crate::snapshot::{IndexSnapshot, SnapshotBuilder};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use lexis_model::identity::{normalize_namespace, trailing_part, version_uri};
use lexis_model::{
    ArtifactRef, AssetPointer, AssetSurrogate, Concept, ConceptScheme, Outcome, ResourceId,
    SchemeDocument, SchemeHeader, SchemeKey, SchemePointer, Term,
};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_ASSET_TYPE_TAG: &str = "Lexicon";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIndexConfig {
    /// Asset type tag identifying vocabulary assets in the catalog.
    pub asset_type_tag: String,
    /// Take the index offline when the catalog cannot be reached.
    pub offline_when_unreachable: bool,
}

impl Default for RemoteIndexConfig {
    fn default() -> Self {
        Self {
            asset_type_tag: DEFAULT_ASSET_TYPE_TAG.to_string(),
            offline_when_unreachable: true,
        }
    }
}

#[derive(Debug, Default)]
struct Published {
    snapshot: Arc<IndexSnapshot>,
    online: bool,
}

pub struct RemoteRepositoryIndex {
    catalog: Arc<dyn AssetCatalog>,
    config: RemoteIndexConfig,
    published: ArcSwap<Published>,
    reindex_lock: Mutex<()>,
}

impl RemoteRepositoryIndex {
    /// Create an offline index; nothing is served before the first reindex.
    pub fn new(catalog: Arc<dyn AssetCatalog>) -> Self {
        Self::with_config(catalog, RemoteIndexConfig::default())
    }

    pub fn with_config(catalog: Arc<dyn AssetCatalog>, config: RemoteIndexConfig) -> Self {
        Self {
            catalog,
            config,
            published: ArcSwap::from_pointee(Published::default()),
            reindex_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &RemoteIndexConfig {
        &self.config
    }

    pub fn is_online(&self) -> bool {
        self.published.load().online
    }

    /// The most recently published snapshot, whether online or not.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.published.load().snapshot)
    }

    /// Rebuild the index from the catalog and publish it atomically.
    pub async fn reindex(&self) -> Result<ReindexReport> {
        let _guard = self.reindex_lock.lock().await;

        let pointers = match self
            .catalog
            .list_vocabulary_assets(&self.config.asset_type_tag)
            .await
        {
            Ok(pointers) => pointers,
            Err(err) => {
                tracing::warn!(
                    catalog = %self.catalog.location(),
                    error = %err,
                    "Asset catalog unreachable, keeping the current snapshot"
                );
                if self.config.offline_when_unreachable {
                    self.set_online(false);
                }
                return Err(match err {
                    Error::CatalogUnavailable(_) => err,
                    other => Error::CatalogUnavailable(other.to_string()),
                });
            }
        };

        let mut builder = SnapshotBuilder::new();
        let mut report = ReindexReport {
            assets: pointers.len(),
            ..ReindexReport::default()
        };

        for pointer in &pointers {
            match self.index_asset(pointer).await {
                Ok(Some(scheme)) => builder.insert(scheme),
                Ok(None) => report.skipped_assets += 1,
                Err(err) => {
                    tracing::warn!(
                        asset = %pointer,
                        error = %err,
                        "Reindex abandoned, keeping the current snapshot"
                    );
                    return Err(asset_error(pointer, err));
                }
            }
        }

        let snapshot = builder.build();
        report.schemes = snapshot.scheme_count();
        report.concepts = snapshot.concept_count();
        report.online = !snapshot.is_empty();

        self.published.store(Arc::new(Published {
            snapshot: Arc::new(snapshot),
            online: report.online,
        }));

        tracing::info!(
            assets = report.assets,
            skipped = report.skipped_assets,
            schemes = report.schemes,
            concepts = report.concepts,
            online = report.online,
            "Remote repository reindexed"
        );
        Ok(report)
    }

    async fn index_asset(&self, pointer: &AssetPointer) -> Result<Option<ConceptScheme>> {
        let surrogate = self.catalog.describe_asset(pointer).await?;
        if surrogate.secondary_ids.is_empty() {
            tracing::warn!(
                asset = %surrogate.asset_id,
                "Asset has no secondary identifier, keying its scheme by the asset id"
            );
        }

        let document = match surrogate.carriers.as_slice() {
            [] => {
                tracing::warn!(asset = %surrogate.asset_id, "Asset has no carriers, skipping");
                return Ok(None);
            }
            [_] => {
                self.catalog
                    .fetch_artifact(&surrogate.asset_id, &ArtifactRef::Canonical)
                    .await?
            }
            [first, rest @ ..] => {
                let mut merged = self
                    .catalog
                    .fetch_artifact(&surrogate.asset_id, &ArtifactRef::Carrier(first.clone()))
                    .await?;
                for carrier in rest {
                    let next = self
                        .catalog
                        .fetch_artifact(&surrogate.asset_id, &ArtifactRef::Carrier(carrier.clone()))
                        .await?;
                    merged = merged.merge(next);
                }
                merged
            }
        };

        let header = scheme_header(&surrogate, &document);
        let terms = document_terms(&document);
        tracing::debug!(
            asset = %surrogate.asset_id,
            scheme = %header.key,
            carriers = surrogate.carriers.len(),
            terms = terms.len(),
            "Indexed remote scheme"
        );
        Ok(Some(build_scheme(header, terms)))
    }

    // Only called while holding the reindex lock.
    fn set_online(&self, online: bool) {
        let current = self.published.load_full();
        if current.online != online {
            self.published.store(Arc::new(Published {
                snapshot: Arc::clone(&current.snapshot),
                online,
            }));
        }
    }

    fn current(&self) -> Option<Arc<IndexSnapshot>> {
        let published = self.published.load();
        published.online.then(|| Arc::clone(&published.snapshot))
    }
}

fn scheme_header(surrogate: &AssetSurrogate, document: &SchemeDocument) -> SchemeHeader {
    let id: &ResourceId = surrogate.scheme_id();
    let series_uri = normalize_namespace(&document.url).to_string();
    let tag = id
        .tag
        .clone()
        .or_else(|| document.name.clone())
        .unwrap_or_else(|| trailing_part(&series_uri).to_string());
    let name = surrogate
        .name
        .clone()
        .or_else(|| document.title.clone())
        .unwrap_or_else(|| tag.clone());

    SchemeHeader {
        key: id.key(),
        tag,
        name,
        version_uri: version_uri(&series_uri, &id.version_tag),
        series_uri,
    }
}

fn asset_error(pointer: &AssetPointer, err: Error) -> Error {
    match err {
        Error::AssetIndexing { .. } => err,
        other => Error::AssetIndexing {
            asset: pointer.to_string(),
            reason: other.to_string(),
        },
    }
}

#[async_trait]
impl Reindexable for RemoteRepositoryIndex {
    async fn reindex(&self) -> Result<ReindexReport> {
        RemoteRepositoryIndex::reindex(self).await
    }
}

impl TermsResolver for RemoteRepositoryIndex {
    fn list_schemes(&self) -> Outcome<Vec<SchemePointer>> {
        match self.current() {
            Some(snapshot) => snapshot.list_schemes(),
            None => Outcome::Unsupported,
        }
    }

    fn get_scheme(&self, key: &SchemeKey) -> Outcome<Arc<ConceptScheme>> {
        match self.current() {
            Some(snapshot) => snapshot.get_scheme(key),
            None => Outcome::Unsupported,
        }
    }

    fn get_concept(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Arc<Concept>> {
        match self.current() {
            Some(snapshot) => snapshot.get_concept(key, concept_id),
            None => Outcome::Unsupported,
        }
    }

    fn list_concepts(&self, key: &SchemeKey) -> Outcome<Vec<Arc<Concept>>> {
        match self.current() {
            Some(snapshot) => snapshot.list_concepts(key),
            None => Outcome::Unsupported,
        }
    }

    fn lookup_across_versions(&self, concept_id: &str) -> Result<Outcome<Arc<Concept>>> {
        match self.current() {
            Some(snapshot) => snapshot.lookup_across_versions(concept_id),
            None => Ok(Outcome::Unsupported),
        }
    }

    fn list_ancestors(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Vec<Term>> {
        match self.current() {
            Some(snapshot) => snapshot.list_ancestors(key, concept_id),
            None => Outcome::Unsupported,
        }
    }

    fn list_closure(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Vec<Term>> {
        match self.current() {
            Some(snapshot) => snapshot.list_closure(key, concept_id),
            None => Outcome::Unsupported,
        }
    }

    fn is_ancestor(
        &self,
        key: &SchemeKey,
        concept_id: &str,
        candidate_id: &str,
    ) -> Outcome<bool> {
        match self.current() {
            Some(snapshot) => snapshot.is_ancestor(key, concept_id, candidate_id),
            None => Outcome::Unsupported,
        }
    }

    fn kind(&self) -> ResolverKind {
        ResolverKind::Remote
    }

    fn source(&self) -> Option<String> {
        Some(self.catalog.location())
    }

    fn as_reindexable(&self) -> Option<&dyn Reindexable> {
        Some(self)
    }
}
