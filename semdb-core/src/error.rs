//! Error types for semdb-core

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid table mapping configuration (unknown datatype, duplicate key, ...)
    ///
    /// Fatal at build time; a schema is never used half-built.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A query fact was added before an identifier was assigned
    #[error("Unknown identifier: {0}")]
    UnknownId(String),

    /// A parse result was read before a container was attached to it
    #[error("Missing semantic data container: {0}")]
    MissingContainer(String),

    /// A sub-object does not belong to the container's page
    #[error("Invalid sub-object: {0}")]
    InvalidSubobject(String),

    /// Malformed subject serialization
    #[error("Invalid subject: {0}")]
    InvalidSubject(String),

    /// JSON parsing error (serde_json)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an unknown identifier error
    pub fn unknown_id(msg: impl Into<String>) -> Self {
        Error::UnknownId(msg.into())
    }

    /// Create a missing container error
    pub fn missing_container(msg: impl Into<String>) -> Self {
        Error::MissingContainer(msg.into())
    }

    /// Create an invalid sub-object error
    pub fn invalid_subobject(msg: impl Into<String>) -> Self {
        Error::InvalidSubobject(msg.into())
    }

    /// Create an invalid subject error
    pub fn invalid_subject(msg: impl Into<String>) -> Self {
        Error::InvalidSubject(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error indicates a caller-ordering bug rather than bad data
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Error::UnknownId(_) | Error::MissingContainer(_) | Error::InvalidSubobject(_)
        )
    }
}
