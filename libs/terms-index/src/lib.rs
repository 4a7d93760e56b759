//! Versioned concept scheme indices
//!
//! Resolves controlled vocabulary concepts by UUID, tag or URI across several
//! independently indexed sources:
//!
//! * [`StaticSchemeIndex`] is built once from a scheme manifest and a
//!   [`ConceptSource`].
//! * [`RemoteRepositoryIndex`] is rebuilt on demand from an [`AssetCatalog`] and
//!   publishes each rebuild atomically.
//! * [`TermsBroker`] tries its members in priority order and falls through only
//!   on [`Outcome::Unsupported`](lexis_model::Outcome::Unsupported).
//!
//! # Example
//!
//! ```rust,no_run
//! use lexis_index::{InMemoryConceptRegistry, StaticSchemeIndex, TermsResolver};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = InMemoryConceptRegistry::from_path(Path::new("registry.json"))?;
//! let index = StaticSchemeIndex::from_manifest_path(Path::new("manifest.json"), &registry)?;
//! let latest = index.lookup_across_versions("KnowledgeAssetType")?;
//! println!("{:?}", latest.found().map(|c| c.version_tag.clone()));
//! # Ok(())
//! # }
//! ```
pub mod broker;
pub mod catalog;
pub mod convert;
pub mod error;
pub mod health;
pub mod reconcile;
pub mod remote_index;
pub mod resolver;
pub mod snapshot;
pub mod source;
pub mod static_index;

pub use broker::{MemberReindex, TermsBroker};
pub use catalog::{default_asset_catalog, AssetCatalog};
pub use error::{Error, Result};
pub use health::{diagnose, ComponentHealth, HealthStatus};
pub use reconcile::latest_version;
pub use remote_index::{RemoteIndexConfig, RemoteRepositoryIndex, DEFAULT_ASSET_TYPE_TAG};
pub use resolver::{ReindexReport, Reindexable, ResolverKind, TermsResolver};
pub use snapshot::{IndexSnapshot, SnapshotBuilder};
pub use source::{ConceptSource, InMemoryConceptRegistry};
pub use static_index::StaticSchemeIndex;

pub use lexis_model::Outcome;
