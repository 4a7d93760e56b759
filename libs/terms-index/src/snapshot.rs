//! Immutable index snapshots.
//!
//! A snapshot is assembled in a private [`SnapshotBuilder`] and frozen with
//! [`SnapshotBuilder::build`]. Once built it is never mutated; indices publish
//! a new snapshot instead.

use crate::error::Result;
use crate::reconcile::latest_version;
use lexis_model::identity::concept_key;
use lexis_model::{Concept, ConceptScheme, Outcome, SchemeKey, SchemePointer, Term};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct IndexSnapshot {
    pointers: Vec<SchemePointer>,
    schemes: HashMap<SchemeKey, Arc<ConceptScheme>>,
    /// Lookup key of a concept to the schemes defining it, in scheme order.
    concept_index: HashMap<Uuid, Vec<SchemeKey>>,
}

/// Scratch storage for a snapshot under construction.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    schemes: Vec<Arc<ConceptScheme>>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scheme, replacing any earlier scheme with the same key.
    pub fn insert(&mut self, scheme: ConceptScheme) {
        if let Some(pos) = self.schemes.iter().position(|s| s.key() == scheme.key()) {
            tracing::warn!(
                scheme = %scheme.key(),
                tag = scheme.tag(),
                "Duplicate scheme key, replacing the earlier definition"
            );
            self.schemes.remove(pos);
        }
        self.schemes.push(Arc::new(scheme));
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    pub fn build(self) -> IndexSnapshot {
        let mut pointers = Vec::with_capacity(self.schemes.len());
        let mut schemes = HashMap::with_capacity(self.schemes.len());
        let mut concept_index: HashMap<Uuid, Vec<SchemeKey>> = HashMap::new();

        for scheme in self.schemes {
            pointers.push(scheme.pointer());
            for key in scheme.lookup_keys() {
                concept_index
                    .entry(*key)
                    .or_default()
                    .push(scheme.key().clone());
            }
            schemes.insert(scheme.key().clone(), scheme);
        }

        IndexSnapshot {
            pointers,
            schemes,
            concept_index,
        }
    }
}

impl IndexSnapshot {
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    pub fn scheme_count(&self) -> usize {
        self.schemes.len()
    }

    pub fn concept_count(&self) -> usize {
        self.schemes.values().map(|s| s.len()).sum()
    }

    pub fn pointers(&self) -> &[SchemePointer] {
        &self.pointers
    }

    pub fn scheme(&self, key: &SchemeKey) -> Option<&Arc<ConceptScheme>> {
        self.schemes.get(key)
    }

    pub fn list_schemes(&self) -> Outcome<Vec<SchemePointer>> {
        Outcome::Found(self.pointers.clone())
    }

    pub fn get_scheme(&self, key: &SchemeKey) -> Outcome<Arc<ConceptScheme>> {
        Outcome::of(self.schemes.get(key).cloned())
    }

    pub fn get_concept(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Arc<Concept>> {
        Outcome::of(self.concept(key, concept_id).cloned())
    }

    pub fn list_concepts(&self, key: &SchemeKey) -> Outcome<Vec<Arc<Concept>>> {
        Outcome::of(self.schemes.get(key).map(|s| s.concepts().to_vec()))
    }

    pub fn list_ancestors(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Vec<Term>> {
        Outcome::of(self.concept(key, concept_id).map(|c| c.ancestors.clone()))
    }

    pub fn list_closure(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Vec<Term>> {
        Outcome::of(self.concept(key, concept_id).map(|c| c.closure.clone()))
    }

    /// Whether `candidate_id` subsumes `concept_id`, transitively.
    pub fn is_ancestor(
        &self,
        key: &SchemeKey,
        concept_id: &str,
        candidate_id: &str,
    ) -> Outcome<bool> {
        self.get_scheme(key).and_then(|scheme| {
            Outcome::of(scheme.concept(concept_id).map(|concept| {
                scheme
                    .concept(candidate_id)
                    .is_some_and(|candidate| concept.has_ancestor(&candidate.uuid))
            }))
        })
    }

    /// Find a concept in whichever scheme version defines it most recently.
    pub fn lookup_across_versions(&self, concept_id: &str) -> Result<Outcome<Arc<Concept>>> {
        let key = concept_key(concept_id);
        let Some(scheme_keys) = self.concept_index.get(&key) else {
            return Ok(Outcome::NotFound);
        };

        let candidates = scheme_keys.iter().filter_map(|scheme_key| {
            let scheme = self.schemes.get(scheme_key)?;
            scheme.concept_by_key(&key).map(|c| (scheme.as_ref(), c))
        });
        Ok(Outcome::of(latest_version(concept_id, candidates)?))
    }

    fn concept(&self, key: &SchemeKey, concept_id: &str) -> Option<&Arc<Concept>> {
        self.schemes.get(key)?.concept(concept_id)
    }
}
