//! Layered configuration: built-in defaults, an optional TOML file, then
//! `LEXIS__*` environment variables (e.g. `LEXIS__CATALOG__URL`).

use anyhow::Context;
use config::{Environment, File, FileFormat};
use lexis_index::{RemoteIndexConfig, DEFAULT_ASSET_TYPE_TAG};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "lexis.toml";
const ENV_PREFIX: &str = "LEXIS";
const ENV_SEPARATOR: &str = "__";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub catalog: CatalogConfig,
    pub broker: BrokerConfig,
    pub logging: LoggingConfig,
}

/// Static scheme index sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
    /// Concept registry: JSON object of source reference to concept terms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<PathBuf>,
}

impl IndexConfig {
    pub fn is_configured(&self) -> bool {
        self.manifest.is_some() && self.registry.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub enabled: bool,
    pub url: String,
    pub asset_type_tag: String,
    pub timeout_secs: u64,
    pub offline_when_unreachable: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://localhost:8080/kar".to_string(),
            asset_type_tag: DEFAULT_ASSET_TYPE_TAG.to_string(),
            timeout_secs: 30,
            offline_when_unreachable: true,
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn index_config(&self) -> RemoteIndexConfig {
        RemoteIndexConfig {
            asset_type_tag: self.asset_type_tag.clone(),
            offline_when_unreachable: self.offline_when_unreachable,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[default]
    RemoteFirst,
    StaticFirst,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration, reading `.env` first.
    ///
    /// An explicit `path` must exist; otherwise `lexis.toml` is used when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let defaults = config::Config::try_from(&Config::default())
            .context("Failed to serialize default configuration")?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<(), String> {
        match (&self.index.manifest, &self.index.registry) {
            (Some(_), None) => {
                return Err("index.manifest is set but index.registry is missing".to_string())
            }
            (None, Some(_)) => {
                return Err("index.registry is set but index.manifest is missing".to_string())
            }
            _ => {}
        }

        if !self.index.is_configured() && !self.catalog.enabled {
            return Err(
                "no terminology source configured: set index.manifest/index.registry or enable the catalog"
                    .to_string(),
            );
        }

        if self.catalog.enabled {
            let url = self.catalog.url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("catalog.url must be an http(s) URL, got '{}'", url));
            }
            if self.catalog.asset_type_tag.trim().is_empty() {
                return Err("catalog.asset_type_tag must not be empty".to_string());
            }
            if self.catalog.timeout_secs == 0 {
                return Err("catalog.timeout_secs must be greater than zero".to_string());
            }
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            ));
        }

        Ok(())
    }
}
