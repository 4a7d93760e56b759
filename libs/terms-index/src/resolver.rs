//! The uniform resolver interface shared by every index and the broker.

use crate::error::Result;
use async_trait::async_trait;
use lexis_model::{Concept, ConceptScheme, Outcome, SchemeKey, SchemePointer, Term};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    Broker,
    Static,
    Remote,
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolverKind::Broker => "broker",
            ResolverKind::Static => "static",
            ResolverKind::Remote => "remote",
        };
        f.write_str(name)
    }
}

/// Read access to concept schemes.
///
/// Every read answers with an [`Outcome`]: a value, `NotFound` when the
/// backend works but has no such key, or `Unsupported` when the backend has no
/// data to answer from at all.
pub trait TermsResolver: Send + Sync {
    fn list_schemes(&self) -> Outcome<Vec<SchemePointer>>;

    fn get_scheme(&self, key: &SchemeKey) -> Outcome<Arc<ConceptScheme>>;

    /// `concept_id` may be a UUID literal, a tag or a resource URI.
    fn get_concept(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Arc<Concept>>;

    fn list_concepts(&self, key: &SchemeKey) -> Outcome<Vec<Arc<Concept>>>;

    /// Fails only on a malformed version tag among the candidate schemes.
    fn lookup_across_versions(&self, concept_id: &str) -> Result<Outcome<Arc<Concept>>>;

    /// Direct ancestors.
    fn list_ancestors(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Vec<Term>>;

    /// Transitive ancestors.
    fn list_closure(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Vec<Term>>;

    fn is_ancestor(&self, key: &SchemeKey, concept_id: &str, candidate_id: &str)
        -> Outcome<bool>;

    fn kind(&self) -> ResolverKind;

    fn source(&self) -> Option<String> {
        None
    }

    fn members(&self) -> &[Arc<dyn TermsResolver>] {
        &[]
    }

    fn as_reindexable(&self) -> Option<&dyn Reindexable> {
        None
    }
}

/// Summary of one successful rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReindexReport {
    pub assets: usize,
    pub skipped_assets: usize,
    pub schemes: usize,
    pub concepts: usize,
    pub online: bool,
}

/// A resolver whose content can be rebuilt from its source.
#[async_trait]
pub trait Reindexable: Send + Sync {
    async fn reindex(&self) -> Result<ReindexReport>;
}
