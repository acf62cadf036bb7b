// Display configuration for the checkstore CLI

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR: &str = "checkstore";
const CONFIG_FILE: &str = "checkstore.yml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Item field printed after the id
    pub label_field: String,
    /// Colorize terminal output
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            label_field: "text".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(eyre!("Config file not found: {}", path.display()));
                }
                Self::load_from(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// `<config dir>/checkstore/checkstore.yml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        debug!(file = ?path, ?config, "Loaded config");
        Ok(config)
    }
}
