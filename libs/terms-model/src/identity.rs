//! Concept identifier derivation.
//!
//! A concept can be addressed by its UUID literal, by its scheme-local tag, or by
//! its full resource URI. All three forms collapse into a single lookup key:
//!
//! 1. the string itself, if it is a UUID literal
//! 2. the trailing part after the last `#` or `/`, if that is a UUID literal
//! 3. a name-based UUID of the whole string otherwise

use uuid::Uuid;

/// Path segment inserted between a namespace URI and a version tag.
pub const VERSIONS: &str = "/versions/";

/// Deterministic name-based UUID for a code, tag or URI that is not itself a UUID.
pub fn name_uuid(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes())
}

/// Parse a UUID literal, ignoring surrounding whitespace and an optional `urn:uuid:` prefix.
pub fn parse_uuid(value: &str) -> Option<Uuid> {
    let value = value.trim();
    let value = value.strip_prefix("urn:uuid:").unwrap_or(value);
    Uuid::parse_str(value).ok()
}

/// The part of an identifier after its last `#` or `/`.
pub fn trailing_part(value: &str) -> &str {
    match value.rfind(['#', '/']) {
        Some(idx) => &value[idx + 1..],
        None => value,
    }
}

/// Lookup key for any of the accepted concept identifier forms.
pub fn concept_key(concept_id: &str) -> Uuid {
    parse_uuid(concept_id)
        .or_else(|| parse_uuid(trailing_part(concept_id)))
        .unwrap_or_else(|| name_uuid(concept_id.trim()))
}

/// UUID for a code defined by a remote scheme document.
pub fn code_to_uuid(code: &str) -> Uuid {
    parse_uuid(code).unwrap_or_else(|| name_uuid(code))
}

/// Strip the fragment after the last `#` from a namespace URI.
pub fn normalize_namespace(uri: &str) -> &str {
    match uri.rfind('#') {
        Some(idx) if idx > 0 => &uri[..idx],
        _ => uri,
    }
}

/// Build a concept URI below a scheme namespace, optionally version specific.
pub fn concept_uri(namespace: &str, version: Option<&str>, code: &str) -> String {
    let mut uri = normalize_namespace(namespace).to_string();
    if let Some(version) = version.filter(|v| !v.is_empty()) {
        uri.push_str(VERSIONS);
        uri.push_str(version);
    }
    if !code.is_empty() {
        uri.push('#');
        uri.push_str(code);
    }
    uri
}

/// Version-specific URI of a scheme series.
pub fn version_uri(series_uri: &str, version_tag: &str) -> String {
    format!(
        "{}{}{}",
        normalize_namespace(series_uri).trim_end_matches('/'),
        VERSIONS,
        version_tag
    )
}
