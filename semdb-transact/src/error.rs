//! Error types for the transact crate

use thiserror::Error;

/// Result type for dispatch and job operations
pub type Result<T> = std::result::Result<T, TransactError>;

/// Errors raised while dispatching updates or running update jobs
#[derive(Error, Debug)]
pub enum TransactError {
    /// The page a job refers to no longer exists
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// No document source is configured for refresh jobs
    #[error("No document source: {0}")]
    NoSource(String),

    /// Enqueue failed
    #[error("Job queue error: {0}")]
    Queue(String),

    /// One or more observers failed
    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    /// Job payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store error wrapper
    #[error("Store error: {0}")]
    Store(#[from] semdb_store::StoreError),

    /// Core error wrapper
    #[error("Core error: {0}")]
    Core(#[from] semdb_core::Error),
}

impl TransactError {
    /// Create a page not found error
    pub fn page_not_found(subject: impl Into<String>) -> Self {
        Self::PageNotFound(subject.into())
    }

    /// Create a missing source error
    pub fn no_source(msg: impl Into<String>) -> Self {
        Self::NoSource(msg.into())
    }

    /// Create a queue error
    pub fn queue(msg: impl Into<String>) -> Self {
        Self::Queue(msg.into())
    }

    /// Create a dispatch error
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }
}
