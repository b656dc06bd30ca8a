use std::path::PathBuf;

use dirs_next::config_dir;
use recdata_util::{env_path_override, expand_tilde};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable pointing at an alternate config file.
pub const CONFIG_PATH_ENV: &str = "RECDATA_CONFIG_PATH";
/// Environment variable overriding the configured schema path.
pub const SCHEMA_PATH_ENV: &str = "RECDATA_SCHEMA_PATH";

/// Locations of the schema and record fixture documents.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub schema_path: Option<String>,
    #[serde(default)]
    pub records_path: Option<String>,
}

impl RegistryConfig {
    /// Loads the config from [`default_config_path`].
    ///
    /// A missing or unreadable file yields the default config.
    pub fn load() -> Self {
        let path = default_config_path();
        if let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(config) = serde_json::from_str(&content)
        {
            debug!(path = %path.display(), "registry config loaded");
            return config;
        }
        RegistryConfig::default()
    }

    /// Schema document location, honoring [`SCHEMA_PATH_ENV`] first.
    pub fn schema_path(&self) -> Option<PathBuf> {
        env_path_override(SCHEMA_PATH_ENV).or_else(|| self.schema_path.as_deref().map(expand_tilde))
    }

    /// Record fixture location, tilde-expanded.
    pub fn records_path(&self) -> Option<PathBuf> {
        self.records_path.as_deref().map(expand_tilde)
    }
}

/// Get the default path for the registry configuration file.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = env_path_override(CONFIG_PATH_ENV) {
        return path;
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recdata")
        .join("config.json")
}
