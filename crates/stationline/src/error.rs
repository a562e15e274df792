use std::path::PathBuf;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::pipeline::PipelineError;

#[derive(Error, Debug)]
pub enum StationlineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Station error: {0}")]
    Station(#[from] StationError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Duplicate station step {step} ('{first}' and '{second}')")]
    DuplicateStep {
        step: i32,
        first: String,
        second: String,
    },
}

#[derive(Error, Debug)]
pub enum StationError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Station validation failed: {message}")]
    Validation { message: String },

    #[error("Step {step} is already used by station '{state_code}'")]
    DuplicateStep { step: i32, state_code: String },

    #[error("Station not found: {0}")]
    NotFound(i64),

    #[error("Station {station_id} still holds {orders} order(s)")]
    InUse { station_id: i64, orders: u64 },
}

pub type Result<T> = std::result::Result<T, StationlineError>;
