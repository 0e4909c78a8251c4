//! Error types for the fallible edges of the game
//!
//! The round itself never fails: bad commands degrade to no-ops. Only
//! loading tuning data and talking to storage can go wrong.

use thiserror::Error;

/// Tuning data could not be used
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Player record storage failures
#[derive(Error, Debug)]
pub enum StorageError {
    /// No storage backend in this environment (private browsing, native build)
    #[error("storage is unavailable")]
    Unavailable,

    /// The backend rejected a read or write
    #[error("storage I/O failed: {0}")]
    Io(String),

    #[error("stored record is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}
