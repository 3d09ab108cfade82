use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::db::store::AccessGrant;

fn default_collection() -> String {
    "ProgressTracker".to_string()
}
fn default_recent_entries() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Workbook file; the data directory is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Collaborators given access when the collection is first created.
    #[serde(default)]
    pub grants: Vec<AccessGrant>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            collection: default_collection(),
            grants: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_recent_entries")]
    pub recent_entries: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            recent_entries: default_recent_entries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "dailytrack")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Workbook path: `--store` override, then config, then the data dir.
    pub fn store_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(p) = cli_override {
            return Ok(p.to_path_buf());
        }
        match &self.store.path {
            Some(p) => Ok(p.clone()),
            None => Ok(Self::data_dir()?.join("dailytrack.db")),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Parsing config.toml")
    }

    /// Creates the directory the workbook will live in.
    pub fn ensure_parent_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Creating {:?}", parent))?;
            }
        }
        Ok(())
    }
}
