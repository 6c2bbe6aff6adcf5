//! Error types for the store crate

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while writing or reading semantic data
#[derive(Error, Debug)]
pub enum StoreError {
    /// A fact could not be routed to a table
    #[error("Routing error: {0}")]
    Routing(String),

    /// Backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Core error wrapper
    #[error("Core error: {0}")]
    Core(#[from] semdb_core::Error),
}

impl StoreError {
    /// Create a routing error
    pub fn routing(msg: impl Into<String>) -> Self {
        Self::Routing(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
