//! Catalog configuration - which store backend to run against
//!
//! Mirrors the usual layering: explicit file, then well-known config file
//! locations, then environment overrides, then defaults.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Top-level configuration for the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database file path, only meaningful for the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Persistent catalog in a SQLite file.
    #[default]
    Sqlite,
    /// Throwaway in-memory catalog, gone when the process exits.
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: None,
        }
    }
}

impl StorageConfig {
    /// Resolve the database path, falling back to the user data directory.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("lunchr").join("catalog.db"))
            .unwrap_or_else(|| PathBuf::from("lunchr.db"))
    }
}

/// Loads [`CatalogConfig`] from files and environment.
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_paths: Self::default_config_paths(),
            env_prefix: "LUNCHR_".to_string(),
        }
    }

    /// Prepend an explicit config path; it wins over the defaults.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.config_paths.insert(0, path);
        self
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("lunchr.toml"), PathBuf::from("lunchr.json")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("lunchr").join("config.toml"));
            paths.push(config_dir.join("lunchr").join("config.json"));
        }
        paths
    }

    /// Load the first config file that exists, then apply env overrides.
    /// No file at all is fine; defaults apply.
    pub fn load(&self) -> Result<CatalogConfig> {
        let mut config = CatalogConfig::default();

        for path in &self.config_paths {
            if path.exists() {
                info!("loading catalog config from {}", path.display());
                config = Self::parse_file(path)?;
                break;
            }
            debug!("no config at {}", path.display());
        }

        self.apply_env_overrides(&mut config)?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<CatalogConfig> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&raw)
                .with_context(|| format!("invalid JSON config {}", path.display())),
            _ => toml::from_str(&raw)
                .with_context(|| format!("invalid TOML config {}", path.display())),
        }
    }

    fn apply_env_overrides(&self, config: &mut CatalogConfig) -> Result<()> {
        if let Ok(backend) = env::var(format!("{}STORAGE_BACKEND", self.env_prefix)) {
            config.storage.backend = match backend.to_lowercase().as_str() {
                "sqlite" => StorageBackend::Sqlite,
                "memory" => StorageBackend::Memory,
                other => bail!("unknown storage backend '{other}'"),
            };
        }
        if let Ok(path) = env::var(format!("{}STORAGE_PATH", self.env_prefix)) {
            config.storage.path = Some(PathBuf::from(path));
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
