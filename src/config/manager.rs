use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    errors::LedgerError,
    storage::json_backend::{ensure_dir, tmp_path, write_atomic},
    utils::paths,
};

use super::{Config, ConfigError};

const CONFIG_FILE: &str = "config.json";

/// Loads and saves [`Config`] as JSON inside the application data directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Uses `$GPA_CORE_HOME` or `~/.gpa_core`.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(base.join(CONFIG_FILE)))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            ensure_dir(parent).map_err(into_config_error)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.config_path);
        write_atomic(&tmp, &json).map_err(into_config_error)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
}

fn into_config_error(err: LedgerError) -> ConfigError {
    match err {
        LedgerError::Io(io) => ConfigError::Io(io),
        other => ConfigError::Serde(other.to_string()),
    }
}
