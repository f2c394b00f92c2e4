//! Waypoint configuration.
//!
//! Loaded from `~/.waypoint/config.toml`. Every key is optional; a missing
//! file means all defaults.
//!
//! ```toml
//! store = "sqlite"              # sqlite | files | memory
//! data-dir = "/var/lib/waypoint"
//! catalog = "tours.toml"        # built-in sample tour when omitted
//! log-level = "info"
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHome,

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Which storage engine holds session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Files,
    Memory,
}

/// Waypoint configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub store: StoreKind,

    /// Where stored state lives. Defaults to `~/.waypoint/data/`.
    pub data_dir: Option<PathBuf>,

    /// TOML catalog file. Relative paths resolve against the config directory.
    pub catalog: Option<PathBuf>,

    /// Default log filter, overridden by `WAYPOINT_LOG`.
    pub log_level: Option<String>,
}

impl Config {
    /// Load config from `~/.waypoint/config.toml`, or defaults if it doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path().ok_or(ConfigError::NoHome)?;
        Self::load_from(&path)
    }

    /// Load config from an explicit path, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(dir) = path.parent() {
            config.catalog = config
                .catalog
                .map(|c| if c.is_relative() { dir.join(c) } else { c });
        }

        Ok(config)
    }

    /// The config file path: `~/.waypoint/config.toml`.
    pub fn path() -> Option<PathBuf> {
        Self::home().map(|h| h.join("config.toml"))
    }

    /// The data directory: `data-dir` if set, else `~/.waypoint/data/`.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| Self::home().map(|h| h.join("data")))
    }

    fn home() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".waypoint"))
    }
}
