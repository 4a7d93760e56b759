//! Conversion of concept terms into indexed concepts.
//!
//! Shared by the static and the remote index. Every term becomes a [`Concept`]
//! whose `ancestors` are its direct supertypes within the same scheme and whose
//! `closure` is the full transitive ancestor set, direct ancestors first.

use lexis_model::identity::{code_to_uuid, concept_uri};
use lexis_model::{
    version_date, Concept, ConceptScheme, ConceptTerm, SchemeDocument, SchemeHeader, Term,
};
use std::collections::{HashMap, HashSet, VecDeque};
use uuid::Uuid;

/// Build one immutable scheme version from its ordered terms.
pub fn build_scheme(header: SchemeHeader, terms: Vec<ConceptTerm>) -> ConceptScheme {
    let terms = dedup_terms(&header, terms);
    let positions: HashMap<Uuid, usize> = terms
        .iter()
        .enumerate()
        .map(|(idx, term)| (term.uuid, idx))
        .collect();
    let parents = resolve_parents(&header, &terms, &positions);

    let concepts = terms
        .iter()
        .enumerate()
        .map(|(idx, term)| {
            let ancestors = parents[idx].iter().map(|&p| to_term(&terms[p])).collect();
            let closure = closure_of(idx, &parents)
                .into_iter()
                .map(|p| to_term(&terms[p]))
                .collect();
            Concept {
                uuid: term.uuid,
                tag: term.tag.clone(),
                name: term.label.clone(),
                resource_id: term.resource_id.clone(),
                version_id: concept_uri(
                    &header.series_uri,
                    Some(&header.key.version_tag),
                    &term.uuid.to_string(),
                ),
                version_tag: header.key.version_tag.clone(),
                namespace_uri: header.series_uri.clone(),
                referent_id: term.referent_id.clone(),
                established_on: term.established_on,
                labels: term.labels.clone(),
                ancestors,
                closure,
            }
        })
        .collect();

    ConceptScheme::new(header, concepts)
}

/// Concept terms defined by a parsed scheme document, in document order.
pub fn document_terms(doc: &SchemeDocument) -> Vec<ConceptTerm> {
    let established_on = doc.version.as_deref().and_then(version_date);

    doc.flatten()
        .into_iter()
        .map(|flat| {
            let concept = flat.concept;
            let uuid = code_to_uuid(&concept.code);
            let label = concept
                .display
                .clone()
                .unwrap_or_else(|| concept.code.clone());

            let mut term = ConceptTerm::new(
                uuid,
                concept.code.clone(),
                label,
                concept_uri(&doc.url, None, &uuid.to_string()),
            )
            .with_ancestors(flat.parents.iter().map(|code| code_to_uuid(code)));
            if let Some(definition) = &concept.definition {
                term = term.with_referent(definition.clone());
            }
            term.established_on = established_on;
            for designation in &concept.designation {
                match designation.label_key() {
                    Some(key) if !term.labels.contains_key(key) => {
                        term = term.with_label(key, designation.value.clone());
                    }
                    _ => {}
                }
            }
            term
        })
        .collect()
}

fn dedup_terms(header: &SchemeHeader, terms: Vec<ConceptTerm>) -> Vec<ConceptTerm> {
    let mut seen = HashSet::with_capacity(terms.len());
    terms
        .into_iter()
        .filter(|term| {
            let fresh = seen.insert(term.uuid);
            if !fresh {
                tracing::warn!(
                    scheme = %header.key,
                    concept = %term.uuid,
                    tag = %term.tag,
                    "Duplicate concept in scheme, keeping the first definition"
                );
            }
            fresh
        })
        .collect()
}

// Edges are accepted in term order; an edge that would close a cycle is dropped,
// so the accepted parent graph is acyclic.
fn resolve_parents(
    header: &SchemeHeader,
    terms: &[ConceptTerm],
    positions: &HashMap<Uuid, usize>,
) -> Vec<Vec<usize>> {
    let mut parents: Vec<Vec<usize>> = vec![Vec::new(); terms.len()];
    for (idx, term) in terms.iter().enumerate() {
        for ancestor in &term.ancestors {
            match positions.get(ancestor) {
                Some(&p) if p == idx => {
                    tracing::warn!(
                        scheme = %header.key,
                        concept = %term.uuid,
                        "Concept lists itself as an ancestor, ignoring"
                    );
                }
                Some(&p) if parents[idx].contains(&p) => {}
                Some(&p) if closure_of(p, &parents).contains(&idx) => {
                    tracing::warn!(
                        scheme = %header.key,
                        concept = %term.uuid,
                        ancestor = %ancestor,
                        "Ancestor would close a cycle, dropping"
                    );
                }
                Some(&p) => parents[idx].push(p),
                None => {
                    tracing::warn!(
                        scheme = %header.key,
                        concept = %term.uuid,
                        ancestor = %ancestor,
                        "Ancestor not defined in scheme, dropping"
                    );
                }
            }
        }
    }
    parents
}

// Breadth-first: direct parents come out first, each concept at most once.
fn closure_of(start: usize, parents: &[Vec<usize>]) -> Vec<usize> {
    let mut seen = HashSet::from([start]);
    let mut order = Vec::new();
    let mut queue: VecDeque<usize> = parents[start].iter().copied().collect();

    while let Some(next) = queue.pop_front() {
        if !seen.insert(next) {
            continue;
        }
        order.push(next);
        queue.extend(parents[next].iter().copied());
    }
    order
}

fn to_term(term: &ConceptTerm) -> Term {
    Term {
        uuid: term.uuid,
        tag: term.tag.clone(),
        name: term.label.clone(),
        resource_id: term.resource_id.clone(),
    }
}
