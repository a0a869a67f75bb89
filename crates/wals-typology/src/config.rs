//! Configuration for locating the WALS tables.
//!
//! Loads config from:
//! 1. Global: ~/.config/wals/config.toml
//! 2. Per-project: .wals/config.toml (overrides global)
//!
//! `WALS_DATA_DIR` overrides `data.dir` from either file.
//!
//! Example config.toml:
//! ```toml
//! [data]
//! dir = "/srv/cldf-datasets-wals/cldf"
//! values = "values.csv"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "WALS_DATA_DIR";

/// Where the three tables live.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub codes: String,
    pub languages: String,
    pub values: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("cldf-datasets-wals"),
            codes: "codes.csv".to_string(),
            languages: "languages.csv".to_string(),
            values: "values.csv".to_string(),
        }
    }
}

/// Table paths resolved against the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePaths {
    pub codes: PathBuf,
    pub languages: PathBuf,
    pub values: PathBuf,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WalsConfig {
    pub data: DataConfig,
}

impl WalsConfig {
    /// Config for a given data directory with default file names.
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data: DataConfig {
                dir: dir.into(),
                ..DataConfig::default()
            },
        }
    }

    /// Load configuration for a project.
    ///
    /// Unreadable or invalid files are skipped, leaving defaults in place.
    pub fn load(root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path()
            && let Some(global) = Self::load_file(&global_path)
        {
            config = global;
        }

        let project_path = root.join(".wals").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = project;
        }

        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data.dir = PathBuf::from(dir);
        }

        config
    }

    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("wals").join("config.toml"))
    }

    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                None
            }
        }
    }

    pub fn paths(&self) -> TablePaths {
        TablePaths {
            codes: self.data.dir.join(&self.data.codes),
            languages: self.data.dir.join(&self.data.languages),
            values: self.data.dir.join(&self.data.values),
        }
    }
}
