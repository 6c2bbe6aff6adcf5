//! Table mapping builder
//!
//! Computes a [`TableSchema`] from configuration in three ordered steps:
//!
//! 1. datatype defaults: one table per data item kind, keyed by subject id
//! 2. special properties: `prefix + lowercase(key)`, typed by the special
//!    registry; redirect tables are keyed by title
//! 3. fixed properties: `prefix + "_" + hash(key)`, typed by configuration and
//!    reserved for that key
//!
//! Later steps override earlier ones for the same table name. The sort key is
//! always indexed without a table, since it is computed rather than stored.
//!
//! `build()` clears all state before recomputing, so repeated builds with the
//! same configuration produce identical output and a failed build leaves no
//! half-built schema behind.

use crate::data_item::DataItemType;
use crate::error::{Error, Result};
use crate::hash::name_hash;
use crate::special;
use crate::table::{TableDefinition, TableSchema};
use semdb_vocab::{props, tables};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info_span};

/// A fixed property entry: explicit datatype for a hot property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedPropertyConfig {
    /// Property key
    pub key: String,
    /// Datatype name (`number`, `blob`, ...)
    pub datatype: String,
}

/// Configuration consumed by [`TableMappingBuilder`]
///
/// Datatypes are kept as names so that unknown ones surface as configuration
/// errors at build time rather than at parse time.
///
/// When deserialized, omitted lists are empty; only the prefix has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMappingConfig {
    /// Prefix for special and fixed property tables
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,
    /// Datatype name → default table name
    #[serde(default)]
    pub datatype_tables: BTreeMap<String, String>,
    /// Special property keys that get their own table
    #[serde(default)]
    pub special_properties: Vec<String>,
    /// Fixed properties with an explicit datatype
    #[serde(default)]
    pub fixed_properties: Vec<FixedPropertyConfig>,
}

fn default_table_prefix() -> String {
    tables::FIXED_PROPERTY_PREFIX.to_string()
}

impl Default for TableMappingConfig {
    /// Stock layout: one table per kind, modification date and redirects
    /// split out.
    fn default() -> Self {
        Self::new(tables::FIXED_PROPERTY_PREFIX)
            .with_datatype_table(DataItemType::Blob, tables::BLOB)
            .with_datatype_table(DataItemType::Uri, tables::URI)
            .with_datatype_table(DataItemType::WikiPage, tables::WIKIPAGE)
            .with_datatype_table(DataItemType::Number, tables::NUMBER)
            .with_datatype_table(DataItemType::Time, tables::TIME)
            .with_datatype_table(DataItemType::Boolean, tables::BOOLEAN)
            .with_special(props::MODIFICATION_DATE)
            .with_special(props::REDIRECT)
            .with_special(props::INSTANCE_OF)
            .with_special(props::SUBCATEGORY_OF)
            .with_special(props::ASK)
            .with_special(props::ASK_STRING)
            .with_special(props::ASK_SIZE)
            .with_special(props::ASK_DEPTH)
            .with_special(props::ASK_FORMAT)
    }
}

impl TableMappingConfig {
    /// Empty configuration with a table prefix
    pub fn new(table_prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: table_prefix.into(),
            datatype_tables: BTreeMap::new(),
            special_properties: Vec::new(),
            fixed_properties: Vec::new(),
        }
    }

    /// Add a datatype default table
    pub fn with_datatype_table(mut self, di_type: DataItemType, table: impl Into<String>) -> Self {
        self.datatype_tables
            .insert(di_type.as_str().to_string(), table.into());
        self
    }

    /// Add a special property key
    pub fn with_special(mut self, key: impl Into<String>) -> Self {
        self.special_properties.push(key.into());
        self
    }

    /// Add a fixed property with its datatype
    pub fn with_fixed(mut self, key: impl Into<String>, di_type: DataItemType) -> Self {
        self.fixed_properties.push(FixedPropertyConfig {
            key: key.into(),
            datatype: di_type.as_str().to_string(),
        });
        self
    }
}

/// Builds the property → table mapping
#[derive(Debug, Clone)]
pub struct TableMappingBuilder {
    config: TableMappingConfig,
    definitions: BTreeMap<String, TableDefinition>,
    index: BTreeMap<String, Option<String>>,
    defaults: BTreeMap<DataItemType, String>,
    built: bool,
}

impl TableMappingBuilder {
    pub fn new(config: TableMappingConfig) -> Self {
        Self {
            config,
            definitions: BTreeMap::new(),
            index: BTreeMap::new(),
            defaults: BTreeMap::new(),
            built: false,
        }
    }

    /// Table name prefix
    pub fn table_prefix(&self) -> &str {
        &self.config.table_prefix
    }

    pub fn config(&self) -> &TableMappingConfig {
        &self.config
    }

    /// Table definitions from the last successful build
    pub fn table_definitions(&self) -> &BTreeMap<String, TableDefinition> {
        &self.definitions
    }

    /// Property key → table name index from the last successful build
    pub fn table_index(&self) -> &BTreeMap<String, Option<String>> {
        &self.index
    }

    /// Compute the schema, replacing any previous result
    pub fn build(&mut self) -> Result<()> {
        let span = info_span!(
            "table_mapping_build",
            prefix = %self.config.table_prefix,
            datatypes = self.config.datatype_tables.len(),
            specials = self.config.special_properties.len(),
            fixed = self.config.fixed_properties.len(),
        );
        let _guard = span.enter();

        self.definitions.clear();
        self.index.clear();
        self.defaults.clear();
        self.built = false;

        let mut definitions = BTreeMap::new();
        let mut index = BTreeMap::new();
        let mut defaults = BTreeMap::new();

        self.add_datatype_tables(&mut definitions, &mut defaults)?;
        self.add_special_tables(&mut definitions, &mut index)?;
        self.add_fixed_tables(&mut definitions, &mut index)?;

        debug!(
            tables = definitions.len(),
            indexed = index.len(),
            "table mapping built"
        );

        self.definitions = definitions;
        self.index = index;
        self.defaults = defaults;
        self.built = true;
        Ok(())
    }

    /// Snapshot of the built schema
    ///
    /// Returns `None` until `build()` has succeeded.
    pub fn schema(&self) -> Option<Arc<TableSchema>> {
        if !self.built {
            return None;
        }
        Some(Arc::new(TableSchema {
            prefix: self.config.table_prefix.clone(),
            definitions: self.definitions.clone(),
            index: self.index.clone(),
            defaults: self.defaults.clone(),
        }))
    }

    /// Reconstruct a definition without a full build.
    ///
    /// Applies the same rules as `build()`: a definition reserved for
    /// `property_key` when one is given, and title keyed rows for redirects.
    pub fn get_definition(
        &self,
        di_type: DataItemType,
        table_name: &str,
        property_key: Option<&str>,
    ) -> TableDefinition {
        let def = TableDefinition::new(di_type, table_name);
        match property_key {
            Some(key) => def
                .with_fixed_property(key)
                .with_id_subject(!special::is_redirect(key)),
            None => def,
        }
    }

    /// Table name of a special property table
    pub fn special_table_name(&self, key: &str) -> String {
        format!("{}{}", self.config.table_prefix, key.to_lowercase())
    }

    /// Table name of a fixed property table
    pub fn fixed_table_name(&self, key: &str) -> String {
        format!("{}_{}", self.config.table_prefix, name_hash(key))
    }

    fn add_datatype_tables(
        &self,
        definitions: &mut BTreeMap<String, TableDefinition>,
        defaults: &mut BTreeMap<DataItemType, String>,
    ) -> Result<()> {
        for (datatype, table) in &self.config.datatype_tables {
            let di_type: DataItemType = datatype.parse()?;
            definitions.insert(table.clone(), self.get_definition(di_type, table, None));
            defaults.insert(di_type, table.clone());
        }
        Ok(())
    }

    fn add_special_tables(
        &self,
        definitions: &mut BTreeMap<String, TableDefinition>,
        index: &mut BTreeMap<String, Option<String>>,
    ) -> Result<()> {
        for key in &self.config.special_properties {
            if key == props::SORT_KEY {
                debug!(key = %key, "sort key is computed, skipping table");
                continue;
            }
            let sp = special::lookup(key)
                .ok_or_else(|| Error::config(format!("unknown special property '{}'", key)))?;
            let table = self.special_table_name(key);
            let def = self.get_definition(sp.type_id.data_item_type(), &table, Some(key));
            definitions.insert(table.clone(), def);
            index.insert(key.clone(), Some(table));
        }
        Ok(())
    }

    fn add_fixed_tables(
        &self,
        definitions: &mut BTreeMap<String, TableDefinition>,
        index: &mut BTreeMap<String, Option<String>>,
    ) -> Result<()> {
        let mut seen = BTreeSet::new();
        for fixed in &self.config.fixed_properties {
            if !seen.insert(fixed.key.as_str()) {
                return Err(Error::config(format!(
                    "duplicate fixed property '{}'",
                    fixed.key
                )));
            }
            if fixed.key == props::SORT_KEY {
                debug!(key = %fixed.key, "sort key is computed, skipping table");
                continue;
            }
            let di_type: DataItemType = fixed.datatype.parse()?;
            let table = self.fixed_table_name(&fixed.key);
            definitions.insert(
                table.clone(),
                self.get_definition(di_type, &table, Some(&fixed.key)),
            );
            index.insert(fixed.key.clone(), Some(table));
        }
        index.insert(props::SORT_KEY.to_string(), None);
        Ok(())
    }
}
