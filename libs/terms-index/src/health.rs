//! Health diagnosis of a resolver or a broker and its members.

use crate::resolver::{ResolverKind, TermsResolver};
use lexis_model::Outcome;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DETAIL_KIND: &str = "lexis.terms.kind";
pub const DETAIL_SOURCE: &str = "lexis.terms.source";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Impaired,
    Down,
}

impl HealthStatus {
    /// All up is up, all down is down, anything else is impaired.
    pub fn aggregate<I: IntoIterator<Item = HealthStatus>>(statuses: I) -> HealthStatus {
        let statuses: Vec<HealthStatus> = statuses.into_iter().collect();
        if statuses.is_empty() {
            HealthStatus::Impaired
        } else if statuses.iter().all(|s| *s == HealthStatus::Up) {
            HealthStatus::Up
        } else if statuses.iter().all(|s| *s == HealthStatus::Down) {
            HealthStatus::Down
        } else {
            HealthStatus::Impaired
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentHealth>,
}

pub fn diagnose(resolver: &dyn TermsResolver) -> ComponentHealth {
    match resolver.kind() {
        ResolverKind::Broker => diagnose_composite(resolver),
        ResolverKind::Static => diagnose_backend(resolver, "Static Terminology Provider"),
        ResolverKind::Remote => diagnose_backend(resolver, "Remote Terminology Provider"),
    }
}

fn diagnose_composite(broker: &dyn TermsResolver) -> ComponentHealth {
    let components: Vec<ComponentHealth> = broker
        .members()
        .iter()
        .map(|member| diagnose(member.as_ref()))
        .collect();

    let message = components
        .is_empty()
        .then(|| "Terminology broker with no components".to_string());

    ComponentHealth {
        name: "Composite Terminology Provider".to_string(),
        status: HealthStatus::aggregate(components.iter().map(|c| c.status)),
        message,
        details: details(broker),
        components,
    }
}

fn diagnose_backend(resolver: &dyn TermsResolver, name: &str) -> ComponentHealth {
    let (status, message) = match resolver.list_schemes() {
        Outcome::Found(pointers) if pointers.is_empty() => (
            HealthStatus::Impaired,
            "No terminologies available".to_string(),
        ),
        Outcome::Found(pointers) => {
            let tags: Vec<&str> = pointers.iter().map(|p| p.tag.as_str()).collect();
            (
                HealthStatus::Up,
                format!("Active vocabularies : {}", tags.join(",")),
            )
        }
        Outcome::NotFound | Outcome::Unsupported => (
            HealthStatus::Impaired,
            "Unable to access vocabularies".to_string(),
        ),
    };

    ComponentHealth {
        name: name.to_string(),
        status,
        message: Some(message),
        details: details(resolver),
        components: Vec::new(),
    }
}

fn details(resolver: &dyn TermsResolver) -> BTreeMap<String, String> {
    let mut details = BTreeMap::new();
    details.insert(DETAIL_KIND.to_string(), resolver.kind().to_string());
    if let Some(source) = resolver.source() {
        details.insert(DETAIL_SOURCE.to_string(), source);
    }
    details
}
