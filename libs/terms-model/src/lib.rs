//! Controlled vocabulary data model
//!
//! Concept schemes (versioned terminologies), their concepts, the manifest and
//! catalog descriptors they are built from, and the three-way [`Outcome`]
//! returned by every resolver.

pub mod asset;
pub mod concept;
pub mod document;
pub mod error;
pub mod identity;
pub mod manifest;
pub mod outcome;
pub mod scheme;
pub mod version;

pub use asset::{ArtifactRef, AssetPointer, AssetSurrogate, ResourceId};
pub use concept::{Concept, ConceptTerm, Term};
pub use document::{ConceptProperty, Designation, FlatConcept, SchemeConcept, SchemeDocument};
pub use error::{ModelError, Result};
pub use identity::{concept_key, name_uuid};
pub use manifest::{load_manifest, parse_manifest, SchemeDescriptor};
pub use outcome::Outcome;
pub use scheme::{ConceptScheme, SchemeHeader, SchemeKey, SchemePointer};
pub use version::{version_date, version_ordinal};
