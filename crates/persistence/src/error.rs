//! Persistence error type.

use thiserror::Error;

/// Errors raised while reading or writing saves.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("cipher key must not be empty")]
    EmptyCipherKey,

    #[error("save version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("no platform data directory available")]
    NoSaveDirectory,
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
