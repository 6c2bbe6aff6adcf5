//! # semdb store
//!
//! Storage seam for semantic data.
//!
//! A [`SemanticStore`] accepts a built [`TableSchema`] and a [`SemanticDiff`]
//! and writes each fact to the table the schema routes it to. Writes must be
//! idempotent: inserts are upserts and deleting an absent row is a no-op, so
//! a retried job can apply the same diff twice without corrupting storage.
//!
//! ## Implementing a backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use semdb_store::{SemanticStore, WriteSummary, Result};
//!
//! #[async_trait]
//! impl SemanticStore for MyStore {
//!     async fn apply(&self, schema: &TableSchema, diff: &SemanticDiff) -> Result<WriteSummary> {
//!         // route each fact with schema.table_for(..)
//!     }
//!     // ...
//! }
//! ```

pub mod error;
pub mod memory;

pub use error::{Result, StoreError};
pub use memory::{MemoryStore, Row, RowKey};

use async_trait::async_trait;
use semdb_core::{SemanticData, SemanticDiff, Subject, TableSchema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Outcome of applying one diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteSummary {
    /// Rows newly inserted (upserts of existing rows are not counted)
    pub inserted: usize,
    /// Rows actually removed
    pub deleted: usize,
    /// Inserted facts routed to no table (computed properties)
    pub skipped: usize,
    /// Tables that were written to
    pub tables: BTreeSet<String>,
}

/// Backend that persists semantic data
#[async_trait]
pub trait SemanticStore: Debug + Send + Sync {
    /// Apply a diff
    ///
    /// Inserts are routed through the schema, all before anything is
    /// written; a routing failure leaves storage untouched. Deletes remove
    /// the matching row from whichever table holds it, so rows written under
    /// an earlier schema can still be removed.
    async fn apply(&self, schema: &TableSchema, diff: &SemanticDiff) -> Result<WriteSummary>;

    /// Stored snapshot of a page, including its sub-objects
    ///
    /// Returns an empty container for unknown subjects.
    async fn semantic_data(&self, subject: &Subject) -> Result<SemanticData>;

    /// Pages with at least one stored fact for a property key
    async fn subjects_using(&self, property_key: &str) -> Result<Vec<Subject>>;
}
