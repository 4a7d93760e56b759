//! Parsed scheme documents served by the remote catalog
//!
//! CodeSystem-shaped: a canonical URL, a business version and a (possibly
//! nested) list of concept definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A terminology artifact in parsed form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemeDocument {
    /// Resource type - always "CodeSystem"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Canonical identifier
    pub url: String,

    /// Business version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Name (computer friendly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Name (human friendly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Concepts in the code system
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept: Vec<SchemeConcept>,

    /// Additional content
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "CodeSystem".to_string()
}

/// Concept definition inside a scheme document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemeConcept {
    /// Code that identifies the concept
    pub code: String,

    /// Text to display to the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// Formal definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    /// Additional representations for the concept
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub designation: Vec<Designation>,

    /// Property values for the concept
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property: Vec<ConceptProperty>,

    /// Child concepts (nested hierarchy)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept: Vec<SchemeConcept>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Designation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<Coding>,

    pub value: String,
}

impl Designation {
    /// Label key: the designation use code, else its language.
    pub fn label_key(&self) -> Option<&str> {
        self.use_
            .as_ref()
            .and_then(|c| c.code.as_deref())
            .or(self.language.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// Property value for a concept
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConceptProperty {
    /// Reference to property definition
    pub code: String,

    /// Value of the property
    #[serde(flatten)]
    pub value: Value,
}

impl ConceptProperty {
    /// Code value of a `parent`/`subsumedBy` property.
    pub fn parent_code(&self) -> Option<&str> {
        if self.code != "parent" && self.code != "subsumedBy" {
            return None;
        }
        self.value.get("valueCode").and_then(|v| v.as_str())
    }
}

/// A concept flattened out of the document hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatConcept<'a> {
    pub concept: &'a SchemeConcept,
    /// Parent codes: the enclosing concept, then any parent properties.
    pub parents: Vec<&'a str>,
}

impl SchemeDocument {
    pub fn new(url: impl Into<String>, version: Option<String>) -> Self {
        Self {
            resource_type: default_resource_type(),
            id: None,
            url: url.into(),
            version,
            name: None,
            title: None,
            concept: Vec::new(),
            extensions: HashMap::new(),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Concatenate the concepts of another carrier of the same scheme.
    pub fn merge(mut self, other: SchemeDocument) -> Self {
        self.concept.extend(other.concept);
        self
    }

    /// Depth-first flattening of the concept hierarchy, in document order.
    pub fn flatten(&self) -> Vec<FlatConcept<'_>> {
        let mut out = Vec::new();
        for concept in &self.concept {
            flatten_into(concept, None, &mut out);
        }
        out
    }
}

fn flatten_into<'a>(
    concept: &'a SchemeConcept,
    enclosing: Option<&'a str>,
    out: &mut Vec<FlatConcept<'a>>,
) {
    let mut parents: Vec<&str> = enclosing.into_iter().collect();
    for code in concept.property.iter().filter_map(ConceptProperty::parent_code) {
        if !parents.contains(&code) {
            parents.push(code);
        }
    }
    out.push(FlatConcept { concept, parents });

    for child in &concept.concept {
        flatten_into(child, Some(concept.code.as_str()), out);
    }
}
