//! Concept schemes: one version of a terminology and the concepts it owns.

use crate::concept::Concept;
use crate::identity::concept_key;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Compound key of a scheme version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeKey {
    pub scheme_uuid: Uuid,
    pub version_tag: String,
}

impl SchemeKey {
    pub fn new(scheme_uuid: Uuid, version_tag: impl Into<String>) -> Self {
        Self {
            scheme_uuid,
            version_tag: version_tag.into(),
        }
    }
}

impl fmt::Display for SchemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.scheme_uuid, self.version_tag)
    }
}

/// Listing entry for one scheme version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemePointer {
    pub scheme_uuid: Uuid,
    pub version_tag: String,
    pub tag: String,
    pub name: String,
    pub series_uri: String,
}

impl SchemePointer {
    pub fn key(&self) -> SchemeKey {
        SchemeKey::new(self.scheme_uuid, self.version_tag.clone())
    }
}

/// Scheme-level attributes, independent of its concepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeHeader {
    pub key: SchemeKey,
    pub tag: String,
    /// Fully-qualified source identifier.
    pub name: String,
    pub series_uri: String,
    pub version_uri: String,
}

/// One immutable version of a terminology.
///
/// Every concept is reachable through its UUID and, as secondary keys, through
/// the lookup keys of its tag and resource URI. Primary keys win over
/// secondary ones when they collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptScheme {
    header: SchemeHeader,
    concepts: Vec<Arc<Concept>>,
    lookup: HashMap<Uuid, usize>,
}

impl ConceptScheme {
    pub fn new(header: SchemeHeader, concepts: Vec<Concept>) -> Self {
        let concepts: Vec<Arc<Concept>> = concepts.into_iter().map(Arc::new).collect();
        let mut lookup = HashMap::with_capacity(concepts.len() * 3);

        for (idx, concept) in concepts.iter().enumerate() {
            lookup.entry(concept.uuid).or_insert(idx);
        }
        for (idx, concept) in concepts.iter().enumerate() {
            lookup.entry(concept_key(&concept.tag)).or_insert(idx);
            lookup.entry(concept_key(&concept.resource_id)).or_insert(idx);
        }

        Self {
            header,
            concepts,
            lookup,
        }
    }

    pub fn header(&self) -> &SchemeHeader {
        &self.header
    }

    pub fn key(&self) -> &SchemeKey {
        &self.header.key
    }

    pub fn tag(&self) -> &str {
        &self.header.tag
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn series_uri(&self) -> &str {
        &self.header.series_uri
    }

    pub fn version_uri(&self) -> &str {
        &self.header.version_uri
    }

    pub fn pointer(&self) -> SchemePointer {
        SchemePointer {
            scheme_uuid: self.header.key.scheme_uuid,
            version_tag: self.header.key.version_tag.clone(),
            tag: self.header.tag.clone(),
            name: self.header.name.clone(),
            series_uri: self.header.series_uri.clone(),
        }
    }

    /// Concepts in source order.
    pub fn concepts(&self) -> &[Arc<Concept>] {
        &self.concepts
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Resolve a UUID literal, tag or resource URI.
    pub fn concept(&self, concept_id: &str) -> Option<&Arc<Concept>> {
        self.concept_by_key(&concept_key(concept_id))
    }

    pub fn concept_by_key(&self, key: &Uuid) -> Option<&Arc<Concept>> {
        self.lookup.get(key).map(|idx| &self.concepts[*idx])
    }

    /// Every key under which a concept of this scheme is reachable.
    pub fn lookup_keys(&self) -> impl Iterator<Item = &Uuid> {
        self.lookup.keys()
    }
}
