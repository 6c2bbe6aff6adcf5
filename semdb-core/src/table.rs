//! Table schema types.
//!
//! These types describe how facts are routed onto physical tables:
//! - one default table per data item kind
//! - one table per configured special property (key derived name)
//! - one table per configured fixed property (hash derived name)
//!
//! A [`TableSchema`] is produced by the
//! [`TableMappingBuilder`](crate::table_builder::TableMappingBuilder) and is
//! immutable afterwards; share it behind an `Arc` for concurrent readers.

use crate::data_item::DataItemType;
use crate::error::{Error, Result};
use crate::property::Property;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Physical table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name, unique within a schema
    pub name: String,
    /// Kind of value stored in the table
    pub di_type: DataItemType,
    /// Whether rows are keyed by a stable subject id (false: keyed by title)
    pub uses_id_subject: bool,
    /// Property key the table is reserved for, if any
    pub fixed_property: Option<String>,
}

impl TableDefinition {
    /// Create a shared (property column) table keyed by subject id
    pub fn new(di_type: DataItemType, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            di_type,
            uses_id_subject: true,
            fixed_property: None,
        }
    }

    /// Reserve the table for a single property
    pub fn with_fixed_property(mut self, key: impl Into<String>) -> Self {
        self.fixed_property = Some(key.into());
        self
    }

    /// Set whether rows are keyed by subject id
    pub fn with_id_subject(mut self, uses_id_subject: bool) -> Self {
        self.uses_id_subject = uses_id_subject;
        self
    }

    /// Whether the table is reserved for a single property
    pub fn is_fixed_property_table(&self) -> bool {
        self.fixed_property.is_some()
    }
}

/// Built table schema.
///
/// - `definitions`: table name → definition
/// - `index`: property key → table name, `None` for properties that are
///   registered but never physically stored (the sort key)
/// - `defaults`: data item kind → default table name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub(crate) prefix: String,
    pub(crate) definitions: BTreeMap<String, TableDefinition>,
    pub(crate) index: BTreeMap<String, Option<String>>,
    pub(crate) defaults: BTreeMap<DataItemType, String>,
}

impl TableSchema {
    /// Table name prefix the schema was built with
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// All table definitions by name
    pub fn definitions(&self) -> &BTreeMap<String, TableDefinition> {
        &self.definitions
    }

    /// Property key → table index
    pub fn index(&self) -> &BTreeMap<String, Option<String>> {
        &self.index
    }

    /// Look up a definition by table name
    pub fn definition(&self, name: &str) -> Option<&TableDefinition> {
        self.definitions.get(name)
    }

    /// Default table for a data item kind
    pub fn default_table(&self, di_type: DataItemType) -> Option<&TableDefinition> {
        self.defaults
            .get(&di_type)
            .and_then(|name| self.definitions.get(name))
    }

    /// Resolve the table a value of `di_type` for `property` is written to.
    ///
    /// Returns `Ok(None)` for properties registered without a table (computed
    /// properties). Returns `Error::Config` when no table can hold the value.
    pub fn table_for(
        &self,
        property: &Property,
        di_type: DataItemType,
    ) -> Result<Option<&TableDefinition>> {
        match self.index.get(property.key()) {
            Some(None) => Ok(None),
            Some(Some(name)) => {
                let def = self.definitions.get(name).ok_or_else(|| {
                    Error::config(format!(
                        "index entry for '{}' points at missing table '{}'",
                        property.key(),
                        name
                    ))
                })?;
                if def.di_type != di_type {
                    return Err(Error::config(format!(
                        "table '{}' stores {} values, got {} for '{}'",
                        name,
                        def.di_type,
                        di_type,
                        property.key()
                    )));
                }
                Ok(Some(def))
            }
            None => match self.default_table(di_type) {
                Some(def) if !def.is_fixed_property_table() => Ok(Some(def)),
                _ => Err(Error::config(format!(
                    "no default table for {} values (property '{}')",
                    di_type,
                    property.key()
                ))),
            },
        }
    }
}
