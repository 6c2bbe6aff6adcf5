//! Query description recorded as facts

use crate::error::{QueryError, Result};
use crate::params::QueryParams;
use serde::Serialize;

/// The parts of an inline query that are stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    /// Normalized query string
    pub query_string: String,
    /// Number of conditions
    pub size: usize,
    /// Subquery depth, 1 for a flat query
    pub depth: usize,
    /// Resolved result format
    pub format: String,
    /// Requested printouts
    pub printouts: Vec<String>,
    /// Result limit, if given
    pub limit: Option<usize>,
}

impl Query {
    /// Build from split parameters
    pub fn from_params(params: &QueryParams) -> Result<Self> {
        if params.conditions.is_empty() {
            return Err(QueryError::empty_query("no conditions given"));
        }
        Ok(Self {
            query_string: params.query_string(),
            size: params.condition_count,
            depth: params.max_nesting + 1,
            format: params.format(),
            printouts: params.printouts.clone(),
            limit: params.limit(),
        })
    }

    /// Split and build from raw parameters
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        Self::from_params(&QueryParams::from_raw(raw))
    }
}
