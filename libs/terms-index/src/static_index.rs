//! Index built once from a scheme manifest and a concept source registry.

use crate::convert::build_scheme;
use crate::error::{Error, Result};
use crate::resolver::{ResolverKind, TermsResolver};
use crate::snapshot::{IndexSnapshot, SnapshotBuilder};
use crate::source::ConceptSource;
use lexis_model::{
    load_manifest, Concept, ConceptScheme, Outcome, SchemeDescriptor, SchemeKey, SchemePointer,
    Term,
};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug)]
pub struct StaticSchemeIndex {
    snapshot: IndexSnapshot,
    source: Option<String>,
}

impl StaticSchemeIndex {
    /// Build the index from manifest descriptors.
    ///
    /// A descriptor whose source cannot be resolved fails the whole build.
    pub fn build(manifest: &[SchemeDescriptor], source: &dyn ConceptSource) -> Result<Self> {
        let mut builder = SnapshotBuilder::new();

        for descriptor in manifest {
            descriptor.validate()?;
            let terms = source.resolve(&descriptor.source_ref).map_err(|e| match e {
                Error::SourceNotFound(_) => e,
                other => Error::Source(format!("{}: {}", descriptor.source_ref, other)),
            })?;
            tracing::debug!(
                scheme = %descriptor.key(),
                source = %descriptor.source_ref,
                terms = terms.len(),
                "Indexing static scheme"
            );
            builder.insert(build_scheme(descriptor.header(), terms));
        }

        let snapshot = builder.build();
        tracing::info!(
            schemes = snapshot.scheme_count(),
            concepts = snapshot.concept_count(),
            "Static scheme index built"
        );

        Ok(Self {
            snapshot,
            source: None,
        })
    }

    /// Load the manifest at `path` and build from it.
    pub fn from_manifest_path(path: &Path, source: &dyn ConceptSource) -> Result<Self> {
        let manifest = load_manifest(path)?;
        let mut index = Self::build(&manifest, source)?;
        index.source = Some(path.display().to_string());
        Ok(index)
    }

    pub fn snapshot(&self) -> &IndexSnapshot {
        &self.snapshot
    }
}

impl TermsResolver for StaticSchemeIndex {
    fn list_schemes(&self) -> Outcome<Vec<SchemePointer>> {
        self.snapshot.list_schemes()
    }

    fn get_scheme(&self, key: &SchemeKey) -> Outcome<Arc<ConceptScheme>> {
        self.snapshot.get_scheme(key)
    }

    fn get_concept(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Arc<Concept>> {
        self.snapshot.get_concept(key, concept_id)
    }

    fn list_concepts(&self, key: &SchemeKey) -> Outcome<Vec<Arc<Concept>>> {
        self.snapshot.list_concepts(key)
    }

    fn lookup_across_versions(&self, concept_id: &str) -> Result<Outcome<Arc<Concept>>> {
        self.snapshot.lookup_across_versions(concept_id)
    }

    fn list_ancestors(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Vec<Term>> {
        self.snapshot.list_ancestors(key, concept_id)
    }

    fn list_closure(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Vec<Term>> {
        self.snapshot.list_closure(key, concept_id)
    }

    fn is_ancestor(
        &self,
        key: &SchemeKey,
        concept_id: &str,
        candidate_id: &str,
    ) -> Outcome<bool> {
        self.snapshot.is_ancestor(key, concept_id, candidate_id)
    }

    fn kind(&self) -> ResolverKind {
        ResolverKind::Static
    }

    fn source(&self) -> Option<String> {
        self.source.clone()
    }
}
