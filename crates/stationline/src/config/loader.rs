use std::collections::HashMap;
use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;
use crate::model::check_state_code;

const SUPPORTED_VERSION: &str = "1.0";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = load_config_from_str(&content)?;
    log::debug!(
        "Loaded config from {} ({} stations)",
        path.display(),
        config.stations.len()
    );
    Ok(config)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != SUPPORTED_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if let Some(path) = &config.database_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation {
                message: "database_path must not be empty".to_string(),
            });
        }
    }

    let mut seen: HashMap<i32, &str> = HashMap::new();
    for station in &config.stations {
        check_state_code(station.step, &station.state_code)
            .map_err(|message| ConfigError::Validation { message })?;

        if let Some(first) = seen.insert(station.step, &station.state_code) {
            return Err(ConfigError::DuplicateStep {
                step: station.step,
                first: first.to_string(),
                second: station.state_code.clone(),
            });
        }
    }

    Ok(())
}
