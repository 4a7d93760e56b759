//! Priority-ordered composition of resolvers.

use crate::error::Result;
use crate::resolver::{ReindexReport, ResolverKind, TermsResolver};
use lexis_model::{Concept, ConceptScheme, Outcome, SchemeKey, SchemePointer, Term};
use std::sync::Arc;

/// Dispatches every read to its members in order and returns the first answer
/// that is not `Unsupported`. `NotFound` is a definitive answer and stops the
/// search. No merging, no caching.
pub struct TermsBroker {
    members: Vec<Arc<dyn TermsResolver>>,
}

/// Outcome of forwarding a reindex to one broker member.
#[derive(Debug)]
pub struct MemberReindex {
    pub kind: ResolverKind,
    pub source: Option<String>,
    pub result: Result<ReindexReport>,
}

impl TermsBroker {
    pub fn new(members: Vec<Arc<dyn TermsResolver>>) -> Self {
        Self { members }
    }

    fn first_do<T>(&self, op: impl Fn(&dyn TermsResolver) -> Outcome<T>) -> Outcome<T> {
        for member in &self.members {
            match op(member.as_ref()) {
                Outcome::Unsupported => continue,
                answer => return answer,
            }
        }
        Outcome::Unsupported
    }

    fn try_first_do<T>(
        &self,
        op: impl Fn(&dyn TermsResolver) -> Result<Outcome<T>>,
    ) -> Result<Outcome<T>> {
        for member in &self.members {
            match op(member.as_ref())? {
                Outcome::Unsupported => continue,
                answer => return Ok(answer),
            }
        }
        Ok(Outcome::Unsupported)
    }

    /// Rebuild every member that supports it, in priority order.
    pub async fn reindex(&self) -> Vec<MemberReindex> {
        let mut reports = Vec::new();
        for member in &self.members {
            let Some(reindexable) = member.as_reindexable() else {
                continue;
            };
            let result = reindexable.reindex().await;
            if let Err(err) = &result {
                tracing::warn!(
                    kind = %member.kind(),
                    source = member.source().as_deref().unwrap_or("-"),
                    error = %err,
                    "Member reindex failed"
                );
            }
            reports.push(MemberReindex {
                kind: member.kind(),
                source: member.source(),
                result,
            });
        }
        reports
    }
}

impl TermsResolver for TermsBroker {
    fn list_schemes(&self) -> Outcome<Vec<SchemePointer>> {
        self.first_do(|m| m.list_schemes())
    }

    fn get_scheme(&self, key: &SchemeKey) -> Outcome<Arc<ConceptScheme>> {
        self.first_do(|m| m.get_scheme(key))
    }

    fn get_concept(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Arc<Concept>> {
        self.first_do(|m| m.get_concept(key, concept_id))
    }

    fn list_concepts(&self, key: &SchemeKey) -> Outcome<Vec<Arc<Concept>>> {
        self.first_do(|m| m.list_concepts(key))
    }

    fn lookup_across_versions(&self, concept_id: &str) -> Result<Outcome<Arc<Concept>>> {
        self.try_first_do(|m| m.lookup_across_versions(concept_id))
    }

    fn list_ancestors(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Vec<Term>> {
        self.first_do(|m| m.list_ancestors(key, concept_id))
    }

    fn list_closure(&self, key: &SchemeKey, concept_id: &str) -> Outcome<Vec<Term>> {
        self.first_do(|m| m.list_closure(key, concept_id))
    }

    fn is_ancestor(
        &self,
        key: &SchemeKey,
        concept_id: &str,
        candidate_id: &str,
    ) -> Outcome<bool> {
        self.first_do(|m| m.is_ancestor(key, concept_id, candidate_id))
    }

    fn kind(&self) -> ResolverKind {
        ResolverKind::Broker
    }

    fn members(&self) -> &[Arc<dyn TermsResolver>] {
        &self.members
    }
}
