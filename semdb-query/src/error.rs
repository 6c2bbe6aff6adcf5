//! Error types for the query crate

use thiserror::Error;

/// Result type for query extraction
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors raised while turning queries into facts
#[derive(Error, Debug)]
pub enum QueryError {
    /// A fact was added before an identifier was assigned
    #[error("Unknown query identifier: {0}")]
    UnknownId(String),

    /// The parameters contain no query conditions
    #[error("Empty query: {0}")]
    EmptyQuery(String),

    /// Parameters could not be serialized for hashing
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Core error wrapper
    #[error("Core error: {0}")]
    Core(#[from] semdb_core::Error),
}

impl QueryError {
    /// Create an unknown identifier error
    pub fn unknown_id(msg: impl Into<String>) -> Self {
        Self::UnknownId(msg.into())
    }

    /// Create an empty query error
    pub fn empty_query(msg: impl Into<String>) -> Self {
        Self::EmptyQuery(msg.into())
    }

    /// Whether this error indicates a caller-ordering bug
    pub fn is_protocol(&self) -> bool {
        match self {
            QueryError::UnknownId(_) => true,
            QueryError::Core(e) => e.is_protocol(),
            _ => false,
        }
    }
}
