//! Error types for provchain.
//!
//! Integrity violations detected by verification are not errors; they are
//! reported as data through [`crate::ledger::ChainVerification`]. This enum
//! covers the fallible surface only: JSON export/import.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for provchain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in provchain operations.
#[derive(Error, Debug)]
pub enum Error {
    // Serialization errors
    #[error("serialization error: {0}")]
    Serialization(String),

    // Chain import errors
    #[error("imported chain is empty")]
    EmptyChain,

    #[error("chain integrity violated at block {0}")]
    ChainIntegrityViolated(Uuid),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
