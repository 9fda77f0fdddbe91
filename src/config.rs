//! Project configuration for orgmine
//!
//! Configuration is stored in `.orgmine/config.toml` and currently covers
//! ingest defaults: the header names of the person-id and manager-id
//! columns, so datasets with different schemas can be ingested without
//! repeating flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Ingest configuration
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Ingest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Header name of the person id column
    #[serde(default = "default_id_column")]
    pub id_column: String,

    /// Header name of the manager id column
    #[serde(default = "default_manager_column")]
    pub manager_column: String,
}

// Defaults match the source dataset's schema (Kaggle Amazon access data).
fn default_id_column() -> String {
    "id".to_string()
}

fn default_manager_column() -> String {
    "MGR_ID".to_string()
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
            manager_column: default_manager_column(),
        }
    }
}

impl Config {
    /// Load configuration from .orgmine/config.toml
    /// Returns default config if file doesn't exist
    pub fn load(orgmine_dir: &Path) -> anyhow::Result<Self> {
        let config_path = orgmine_dir.join("config.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to read config: {}", e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))?;

        Ok(config)
    }

    /// Save configuration to .orgmine/config.toml
    pub fn save(&self, orgmine_dir: &Path) -> anyhow::Result<()> {
        let config_path = orgmine_dir.join("config.toml");

        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

        fs::write(&config_path, content)
            .map_err(|e| anyhow::anyhow!("Failed to write config: {}", e))?;

        Ok(())
    }
}
