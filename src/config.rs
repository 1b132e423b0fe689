//! Configuration file support.
//!
//! Reads `config.toml` from `$PURSUIT_CONFIG` or the platform config dir.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::db::Database;

pub const CONFIG_ENV: &str = "PURSUIT_CONFIG";
pub const DB_PATH_ENV: &str = "PURSUIT_DB_PATH";

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct StorageConfig {
    /// SQLite file holding every collection.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct SessionConfig {
    /// Partition the data is stored under. Default: "local"
    #[serde(default)]
    pub user: Option<String>,
}

impl Config {
    /// Load config from the default location.
    /// Returns default config if the file is missing or unreadable.
    pub fn load() -> Self {
        match Self::find_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring unparseable config");
                Self::default()
            }
        }
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "pursuit").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// `$PURSUIT_DB_PATH`, then `storage.path`, then the platform data dir.
    pub fn db_path(&self) -> PathBuf {
        self.resolve_db_path(std::env::var_os(DB_PATH_ENV).map(PathBuf::from))
    }

    fn resolve_db_path(&self, from_env: Option<PathBuf>) -> PathBuf {
        from_env
            .or_else(|| self.storage.path.clone())
            .unwrap_or_else(Database::default_path)
    }
}
