//! Server settings, read from a RON file.
//!
//! The path comes from `SCHEDULER_CONFIG` and falls back to
//! `./scheduler.ron`. A missing file means all defaults.

use crate::error::ConfigError;
use ::serde::*;
use log::info;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV_VAR: &str = "SCHEDULER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "./scheduler.ron";

// Debug vs release address
#[cfg(debug_assertions)]
const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";
#[cfg(not(debug_assertions))]
const DEFAULT_ADDRESS: &str = "0.0.0.0:8080";

const DEFAULT_CATALOG_PATH: &str = "./data.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub address: String,
    pub catalog_path: PathBuf,
    /// Most schedules returned per request; the total is always reported.
    pub max_schedules: usize,
    /// Requests whose section combinations exceed this are refused before
    /// searching.
    pub max_search_space: u64,
    pub generation_timeout_secs: u64,
    /// How often the catalog file is checked for changes.
    pub reload_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: DEFAULT_ADDRESS.to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            max_schedules: 500,
            max_search_space: 200_000,
            generation_timeout_secs: 10,
            reload_interval_secs: 600,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Config::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        ron::from_str(&data).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_secs)
    }
}
