//! Common error types for SipBook

use thiserror::Error;

use crate::ledger::LedgerError;
use crate::lookup::RecipeLookupError;
use crate::model::{Category, DrinkKind};

/// Common result type for SipBook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the SipBook crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored JSON column could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration file could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested composition not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or persisted record
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Create of an id that is already stored
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Category does not apply to this kind of drink
    #[error("{category} does not apply to a {kind}")]
    NotApplicable { category: Category, kind: DrinkKind },

    /// Rejected ledger mutation
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Original recipe lookup failure
    #[error(transparent)]
    Lookup(#[from] RecipeLookupError),
}
