//! "Most recent version wins" reconciliation for cross-version lookups.

use crate::error::Result;
use lexis_model::{version_ordinal, Concept, ConceptScheme};
use std::sync::Arc;

/// Pick the concept defined by the scheme with the greatest version ordinal.
///
/// Candidates are visited in enumeration order and only a strictly greater
/// ordinal replaces the current pick. When two scheme versions share the
/// greatest ordinal with diverging definitions the first one is kept and the
/// discrepancy is logged. Any malformed version tag aborts the lookup.
pub fn latest_version<'a, I>(concept_id: &str, candidates: I) -> Result<Option<Arc<Concept>>>
where
    I: IntoIterator<Item = (&'a ConceptScheme, &'a Arc<Concept>)>,
{
    let mut latest: Option<(i64, &ConceptScheme, &Arc<Concept>)> = None;

    for (scheme, concept) in candidates {
        let ordinal = version_ordinal(&scheme.key().version_tag)?;
        match latest {
            Some((best, _, _)) if ordinal < best => {}
            Some((best, kept_scheme, kept)) if ordinal == best => {
                if !kept.same_definition(concept) {
                    tracing::warn!(
                        concept = concept_id,
                        kept = %kept_scheme.key(),
                        ignored = %scheme.key(),
                        "Conflicting definitions share the latest version, keeping the first"
                    );
                }
            }
            _ => latest = Some((ordinal, scheme, concept)),
        }
    }

    Ok(latest.map(|(_, _, concept)| Arc::clone(concept)))
}
