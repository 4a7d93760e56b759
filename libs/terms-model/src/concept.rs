//! Concepts and the term records they are built from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Lightweight reference to a concept, used for ancestor and closure lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub uuid: Uuid,
    pub tag: String,
    pub name: String,
    pub resource_id: String,
}

/// A single controlled term, as indexed.
///
/// `ancestors` holds the direct supertypes only; `closure` holds the full
/// transitive ancestor set and always contains every direct ancestor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub uuid: Uuid,
    pub tag: String,
    pub name: String,
    /// Version-independent concept URI.
    pub resource_id: String,
    /// Version-specific concept URI.
    pub version_id: String,
    pub version_tag: String,
    pub namespace_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub established_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub ancestors: Vec<Term>,
    #[serde(default)]
    pub closure: Vec<Term>,
}

impl Concept {
    pub fn as_term(&self) -> Term {
        Term {
            uuid: self.uuid,
            tag: self.tag.clone(),
            name: self.name.clone(),
            resource_id: self.resource_id.clone(),
        }
    }

    /// Deep equality ignoring `labels`.
    pub fn same_definition(&self, other: &Concept) -> bool {
        self.uuid == other.uuid
            && self.tag == other.tag
            && self.name == other.name
            && self.resource_id == other.resource_id
            && self.version_id == other.version_id
            && self.version_tag == other.version_tag
            && self.namespace_uri == other.namespace_uri
            && self.referent_id == other.referent_id
            && self.established_on == other.established_on
            && self.ancestors == other.ancestors
            && self.closure == other.closure
    }

    pub fn has_ancestor(&self, uuid: &Uuid) -> bool {
        self.closure.iter().any(|t| &t.uuid == uuid)
    }
}

/// A concept term as materialized by a concept source, before indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptTerm {
    pub uuid: Uuid,
    pub tag: String,
    pub label: String,
    pub resource_id: String,
    /// Direct ancestors, by concept UUID.
    #[serde(default)]
    pub ancestors: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub established_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl ConceptTerm {
    pub fn new(
        uuid: Uuid,
        tag: impl Into<String>,
        label: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            uuid,
            tag: tag.into(),
            label: label.into(),
            resource_id: resource_id.into(),
            ancestors: Vec::new(),
            referent_id: None,
            established_on: None,
            labels: BTreeMap::new(),
        }
    }

    pub fn with_ancestors(mut self, ancestors: impl IntoIterator<Item = Uuid>) -> Self {
        self.ancestors = ancestors.into_iter().collect();
        self
    }

    pub fn with_referent(mut self, referent_id: impl Into<String>) -> Self {
        self.referent_id = Some(referent_id.into());
        self
    }

    pub fn with_label(mut self, code: impl Into<String>, text: impl Into<String>) -> Self {
        self.labels.insert(code.into(), text.into());
        self
    }
}
