use crate::error::ExploreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR: &str = "globex";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// The two provider credentials forwarded as request headers. Opaque and
/// never validated locally; a wrong key only shows up as a failed search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(default)]
    pub openweather: String,
    #[serde(default)]
    pub unsplash: String,
}

impl ApiKeys {
    /// Trims surrounding whitespace from both keys. Applied on save so the
    /// stored values match what gets sent on the wire.
    pub fn normalized(&self) -> ApiKeys {
        ApiKeys {
            openweather: self.openweather.trim().to_string(),
            unsplash: self.unsplash.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub keys: ApiKeys,
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ExploreError> {
        let base = dirs::config_dir().ok_or_else(|| {
            ExploreError::Configuration("could not determine the config directory".to_string())
        })?;
        Ok(base.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn load(path: &PathBuf) -> Result<Self, ExploreError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ExploreError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents).map_err(|e| {
            ExploreError::Configuration(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn save(&self, path: &PathBuf) -> Result<(), ExploreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ExploreError::Configuration(format!(
                    "failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let contents = toml::to_string_pretty(self).map_err(|e| {
            ExploreError::Configuration(format!("failed to serialize config: {}", e))
        })?;
        fs::write(path, contents).map_err(|e| {
            ExploreError::Configuration(format!("failed to write {}: {}", path.display(), e))
        })
    }

    /// Replaces the stored keys (trimmed), persists, and returns the updated
    /// config so the caller holds the new settings value.
    pub fn save_keys(mut self, keys: ApiKeys, path: &PathBuf) -> Result<Self, ExploreError> {
        self.keys = keys.normalized();
        self.save(path)?;
        Ok(self)
    }
}
