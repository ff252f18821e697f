//! Error types for rmh-notify
//!
//! Validation never errors (invalid data is cleaned to defaults); what can
//! fail is the store itself and record serialization on the way in.

use thiserror::Error;

/// Result type for rmh-notify operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for rmh-notify operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Settings record (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
