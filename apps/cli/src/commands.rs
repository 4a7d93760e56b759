//! Command execution against the configured terminology broker.

use crate::config::{Config, Priority};
use anyhow::Context;
use lexis_index::{
    default_asset_catalog, diagnose, HealthStatus, InMemoryConceptRegistry, Outcome, RemoteRepositoryIndex,
    StaticSchemeIndex, TermsBroker, TermsResolver,
};
use lexis_model::{Concept, SchemeKey};
use serde::Serialize;
use serde_json::{json, Value};
use std::process::ExitCode;
use std::sync::Arc;
use uuid::Uuid;

pub const EXIT_FOUND: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_UNSUPPORTED: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, clap::Subcommand)]
pub enum Command {
    /// List every scheme version
    Schemes,
    /// List the concepts of one scheme version
    Concepts { scheme: Uuid, version: String },
    /// Resolve a concept by UUID, tag or URI within one scheme version
    Concept {
        scheme: Uuid,
        version: String,
        id: String,
    },
    /// Resolve a concept in its most recent defining scheme version
    Lookup { id: String },
    /// List the direct (or, with --closure, all) ancestors of a concept
    Ancestors {
        scheme: Uuid,
        version: String,
        id: String,
        #[arg(long)]
        closure: bool,
    },
    /// Test whether `candidate` subsumes `id`
    IsAncestor {
        scheme: Uuid,
        version: String,
        id: String,
        candidate: String,
    },
    /// Diagnose every configured terminology source
    Health,
    /// Rebuild the remote repository index
    Reindex,
}

/// Rendered command result.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub body: Value,
    pub exit: u8,
}

impl Report {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit)
    }
}

/// Assemble the broker from the configured sources, in configured priority.
///
/// The remote index is warmed with an initial reindex unless `warm` is false.
/// A catalog that does not answer the ping is not crawled; the index then stays
/// offline so reads fall through to the next member.
pub async fn build_broker(config: &Config, warm: bool) -> anyhow::Result<TermsBroker> {
    let static_index: Option<Arc<dyn TermsResolver>> =
        match (&config.index.manifest, &config.index.registry) {
            (Some(manifest), Some(registry)) => {
                let registry = InMemoryConceptRegistry::from_path(registry).with_context(|| {
                    format!("Failed to load concept registry {}", registry.display())
                })?;
                let index = StaticSchemeIndex::from_manifest_path(manifest, &registry)
                    .with_context(|| {
                        format!("Failed to build static index from {}", manifest.display())
                    })?;
                Some(Arc::new(index))
            }
            _ => None,
        };

    let remote_index: Option<Arc<dyn TermsResolver>> = if config.catalog.enabled {
        let catalog = default_asset_catalog(&config.catalog.url, config.catalog.timeout())
            .context("Failed to create catalog client")?;
        let index =
            RemoteRepositoryIndex::with_config(catalog.clone(), config.catalog.index_config());
        if warm {
            match catalog.ping().await {
                Ok(()) => {
                    if let Err(err) = index.reindex().await {
                        tracing::warn!(error = %err, "Remote index unavailable, continuing offline");
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        catalog = %catalog.location(),
                        error = %err,
                        "Asset catalog unreachable, continuing offline"
                    );
                }
            }
        }
        Some(Arc::new(index))
    } else {
        None
    };

    let ordered = match config.broker.priority {
        Priority::RemoteFirst => [remote_index, static_index],
        Priority::StaticFirst => [static_index, remote_index],
    };
    Ok(TermsBroker::new(ordered.into_iter().flatten().collect()))
}

pub async fn run(command: &Command, broker: &TermsBroker) -> anyhow::Result<Report> {
    let report = match command {
        Command::Schemes => render(broker.list_schemes()),
        Command::Concepts { scheme, version } => {
            let key = SchemeKey::new(*scheme, version.clone());
            render(broker.list_concepts(&key).map(|concepts| {
                concepts
                    .iter()
                    .map(|c| concept_json(c))
                    .collect::<Vec<_>>()
            }))
        }
        Command::Concept {
            scheme,
            version,
            id,
        } => {
            let key = SchemeKey::new(*scheme, version.clone());
            render(broker.get_concept(&key, id).map(|c| concept_json(&c)))
        }
        Command::Lookup { id } => {
            let outcome = broker
                .lookup_across_versions(id)
                .with_context(|| format!("Failed to look up '{}' across versions", id))?;
            render(outcome.map(|c| concept_json(&c)))
        }
        Command::Ancestors {
            scheme,
            version,
            id,
            closure,
        } => {
            let key = SchemeKey::new(*scheme, version.clone());
            if *closure {
                render(broker.list_closure(&key, id))
            } else {
                render(broker.list_ancestors(&key, id))
            }
        }
        Command::IsAncestor {
            scheme,
            version,
            id,
            candidate,
        } => {
            let key = SchemeKey::new(*scheme, version.clone());
            render(broker.is_ancestor(&key, id, candidate))
        }
        Command::Health => {
            let health = diagnose(broker);
            Report {
                exit: if health.status == HealthStatus::Up {
                    EXIT_FOUND
                } else {
                    EXIT_FAILURE
                },
                body: serde_json::to_value(&health)?,
            }
        }
        Command::Reindex => {
            let results = broker.reindex().await;
            let failed = results.iter().any(|r| r.result.is_err());
            let members: Vec<Value> = results
                .iter()
                .map(|r| match &r.result {
                    Ok(report) => json!({
                        "kind": r.kind,
                        "source": r.source,
                        "report": report,
                    }),
                    Err(err) => json!({
                        "kind": r.kind,
                        "source": r.source,
                        "error": err.to_string(),
                    }),
                })
                .collect();
            Report {
                exit: if failed { EXIT_FAILURE } else { EXIT_FOUND },
                body: Value::Array(members),
            }
        }
    };
    Ok(report)
}

fn render<T: Serialize>(outcome: Outcome<T>) -> Report {
    let exit = match &outcome {
        Outcome::Found(_) => EXIT_FOUND,
        Outcome::NotFound => EXIT_NOT_FOUND,
        Outcome::Unsupported => EXIT_UNSUPPORTED,
    };
    let body = serde_json::to_value(&outcome)
        .unwrap_or_else(|err| json!({ "outcome": "error", "error": err.to_string() }));
    Report { body, exit }
}

fn concept_json(concept: &Concept) -> Value {
    serde_json::to_value(concept).unwrap_or(Value::Null)
}
