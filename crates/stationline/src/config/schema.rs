use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::ConfigError;
use crate::model::NewStation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub stations: Vec<StationConfig>,
}

impl Config {
    /// The configured database location, or `~/.stationline/data/stationline.db`.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        db::default_database_path().ok_or_else(|| ConfigError::Validation {
            message: "No database_path configured and no home directory found".to_string(),
        })
    }
}

/// One station of the production line as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    pub step: i32,
    pub state_code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<&StationConfig> for NewStation {
    fn from(station: &StationConfig) -> Self {
        NewStation {
            step: station.step,
            state_code: station.state_code.trim().to_string(),
            name: station.name.clone(),
            status: station.status.clone(),
        }
    }
}
