//! Settings for the pipeline, the snapshot store and the web adapter.
//!
//! Resolution order, highest first:
//! 1. Command-line flags (applied by the binary on top of the loaded value)
//! 2. Environment variables (`NEWSAPI_KEY`, `NR_CONFIG`)
//! 3. TOML config file
//! 4. Compiled defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const CONFIG_ENV_VAR: &str = "NR_CONFIG";
pub const API_KEY_ENV_VAR: &str = "NEWSAPI_KEY";
pub const DEFAULT_CONFIG_FILE: &str = "nr.toml";

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "technology",
    "sports",
    "business",
    "entertainment",
    "health",
    "science",
    "finance",
];
pub const DEFAULT_REGIONS: &[&str] = &["us", "gb", "ca", "au"];
pub const DEFAULT_PREFERENCES: &[&str] = &["technology", "science"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fetch: FetchSettings,
    pub storage: StorageSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
    pub timeout_secs: u64,
    pub concurrency: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://newsapi.org/v2".to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            regions: DEFAULT_REGIONS.iter().map(|s| s.to_string()).collect(),
            max_attempts: 3,
            retry_delay_secs: 1,
            timeout_secs: 10,
            concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory`, `json` or `sqlite`
    pub kind: String,
    /// Directory for `json`, database file for `sqlite`
    pub location: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            kind: "json".to_string(),
            location: Some("./data".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    /// Substituted when a request carries no preferences
    pub default_preferences: Vec<String>,
    pub default_limit: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            default_preferences: DEFAULT_PREFERENCES.iter().map(|s| s.to_string()).collect(),
            default_limit: 10,
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load settings from the first config file found, then apply environment
    /// overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_ENV_VAR).ok();
        let mut settings = match resolve_config_path(explicit, env_path.as_deref()) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
            if !key.is_empty() {
                settings.fetch.api_key = Some(key);
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.max_attempts == 0 {
            return Err(Error::Config("fetch.max_attempts must be at least 1".to_string()));
        }
        if self.fetch.concurrency == 0 {
            return Err(Error::Config("fetch.concurrency must be at least 1".to_string()));
        }
        if self.fetch.categories.is_empty() || self.fetch.regions.is_empty() {
            return Err(Error::Config(
                "fetch.categories and fetch.regions must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// An explicit path must exist; the env var and the default file are only
/// used when present.
fn resolve_config_path(explicit: Option<&Path>, env_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_path.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
    default.exists().then_some(default)
}
