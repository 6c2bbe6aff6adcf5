//! Shared handle to the current table schema

use parking_lot::RwLock;
use semdb_core::TableSchema;
use std::sync::Arc;

/// Current schema, swapped wholesale on configuration reload
///
/// Readers take a cheap `Arc` snapshot and keep using it for the whole write,
/// so a reload never changes routing halfway through a diff.
#[derive(Debug, Clone)]
pub struct SchemaHandle {
    inner: Arc<RwLock<Arc<TableSchema>>>,
}

impl SchemaHandle {
    pub fn new(schema: Arc<TableSchema>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(schema)),
        }
    }

    /// Snapshot of the current schema
    pub fn current(&self) -> Arc<TableSchema> {
        self.inner.read().clone()
    }

    /// Replace the schema, returning the previous one
    pub fn replace(&self, schema: Arc<TableSchema>) -> Arc<TableSchema> {
        std::mem::replace(&mut *self.inner.write(), schema)
    }
}
