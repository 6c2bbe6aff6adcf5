//! Error types for the api crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the engine facade
#[derive(Error, Debug)]
pub enum ApiError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file could not be parsed
    #[error("Failed to parse config file {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    /// Config value is invalid
    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    /// Core error wrapper
    #[error("Core error: {0}")]
    Core(#[from] semdb_core::Error),

    /// Store error wrapper
    #[error("Store error: {0}")]
    Store(#[from] semdb_store::StoreError),

    /// Transact error wrapper
    #[error("Transact error: {0}")]
    Transact(#[from] semdb_transact::TransactError),

    /// Query error wrapper
    #[error("Query error: {0}")]
    Query(#[from] semdb_query::QueryError),
}

impl ApiError {
    /// Create an invalid config value error
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Whether this is a configuration problem (file, value, or table layout)
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ApiError::Io { .. }
                | ApiError::Parse { .. }
                | ApiError::InvalidValue(_)
                | ApiError::Core(semdb_core::Error::Config(_))
        )
    }
}
