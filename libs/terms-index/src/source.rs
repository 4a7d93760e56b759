//! Concept source registry: resolves a scheme's source reference into its terms.

use crate::error::{Error, Result};
use lexis_model::ConceptTerm;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Materializes the ordered concept terms of a scheme from an opaque source reference.
pub trait ConceptSource: Send + Sync {
    fn resolve(&self, source_ref: &str) -> Result<Vec<ConceptTerm>>;
}

/// Table-backed registry keyed by source reference.
///
/// Populated explicitly or from a JSON object mapping each source reference to
/// its array of concept terms.
#[derive(Debug, Default, Clone)]
pub struct InMemoryConceptRegistry {
    sources: HashMap<String, Vec<ConceptTerm>>,
}

impl InMemoryConceptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source_ref: impl Into<String>, terms: Vec<ConceptTerm>) {
        self.sources.insert(source_ref.into(), terms);
    }

    pub fn with_source(mut self, source_ref: impl Into<String>, terms: Vec<ConceptTerm>) -> Self {
        self.register(source_ref, terms);
        self
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let sources: HashMap<String, Vec<ConceptTerm>> = serde_json::from_slice(bytes)?;
        Ok(Self { sources })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let registry = Self::from_slice(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            sources = registry.len(),
            "Loaded concept registry"
        );
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ConceptSource for InMemoryConceptRegistry {
    fn resolve(&self, source_ref: &str) -> Result<Vec<ConceptTerm>> {
        self.sources
            .get(source_ref)
            .cloned()
            .ok_or_else(|| Error::SourceNotFound(source_ref.to_string()))
    }
}
