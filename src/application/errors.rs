//! Application layer errors

use std::time::Duration;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Ledger collaborator errors
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Credentials or identifiers for the ledger are absent
    #[error("Ledger not configured: {0}")]
    NotConfigured(String),

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    #[error("Ledger rejected append: {0}")]
    Rejected(String),

    /// The cached connection is no longer valid and must be re-established
    #[error("Ledger connection stale: {0}")]
    Stale(String),

    #[error("Ledger append timed out after {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn is_stale(&self) -> bool {
        matches!(self, LedgerError::Stale(_))
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, LedgerError::NotConfigured(_))
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
