//! Deterministic query identifiers
//!
//! An inline query is identified by a content hash over its raw parameters,
//! never by a counter. An unchanged query re-parsed after an unrelated edit
//! keeps its id and diffs as unchanged; any parameter change yields a new id.

use crate::error::Result;
use semdb_core::name_hash;
use semdb_vocab::QUERY_ID_PREFIX;

/// Hashes raw query parameters into a sub-object name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashIdGenerator {
    params: Vec<String>,
    prefix: String,
}

impl HashIdGenerator {
    /// Create a generator over raw parameters
    ///
    /// Parameters are trimmed and empty ones dropped, so whitespace-only
    /// differences do not change the id. Order is kept.
    pub fn new<S: AsRef<str>>(params: &[S]) -> Self {
        Self {
            params: params
                .iter()
                .map(|p| p.as_ref().trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            prefix: QUERY_ID_PREFIX.to_string(),
        }
    }

    /// Use a different id prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Normalized parameters the id is computed from
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Generate the identifier (`prefix` + fixed-width hash)
    pub fn generate(&self) -> Result<String> {
        // JSON keeps parameter boundaries unambiguous
        let encoded = serde_json::to_string(&self.params)?;
        Ok(format!("{}{}", self.prefix, name_hash(&encoded)))
    }
}
