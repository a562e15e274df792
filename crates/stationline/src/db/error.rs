use std::path::PathBuf;
use thiserror::Error;

/// Storage failures. Any of these aborts the enclosing transaction.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot prepare database directory '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema migration {version} failed: {reason}")]
    Migration { version: u32, reason: String },

    #[error("Database connection mutex poisoned")]
    LockPoisoned,
}
