//! # semdb core
//!
//! Data model and in-memory algorithms for extracting semantic data.
//!
//! This crate provides:
//! - Model types: `Subject`, `Property`, `DataItem`, `Fact`
//! - Table mapping: `TableMappingBuilder` producing an immutable `TableSchema`
//! - The per-subject container `SemanticData` and its `SemanticDiff`
//! - `DataValueFactory` for interpreting annotation text
//!
//! ## Design Principles
//!
//! 1. **Runtime-agnostic**: no I/O and no async here; stores and queues live
//!    in their own crates
//! 2. **Never drop a value silently**: rejected values become error markers
//! 3. **Deterministic output**: schemas, fact lists and diffs are sorted
//!
//! ## Example
//!
//! ```ignore
//! use semdb_core::{TableMappingBuilder, TableMappingConfig, SemanticData, Subject};
//!
//! let mut builder = TableMappingBuilder::new(TableMappingConfig::default());
//! builder.build()?;
//! let schema = builder.schema();
//!
//! let mut data = SemanticData::new(Subject::page("Berlin"));
//! data.add_property_value(&factory.new_property_value("Population", "3,500,000"));
//! let diff = data.diff(&previous);
//! ```

pub mod data_item;
pub mod data_value;
pub mod diff;
pub mod error;
pub mod fact;
pub mod hash;
pub mod property;
pub mod semantic_data;
pub mod special;
pub mod subject;
pub mod table;
pub mod table_builder;
pub mod type_id;

pub use data_item::{DataItem, DataItemType};
pub use data_value::{DataValue, DataValueFactory};
pub use diff::SemanticDiff;
pub use error::{Error, Result};
pub use fact::Fact;
pub use hash::{name_hash, sha256_hex, NAME_HASH_LEN};
pub use property::Property;
pub use semantic_data::SemanticData;
pub use special::SpecialProperty;
pub use subject::{normalize_title, Subject};
pub use table::{TableDefinition, TableSchema};
pub use table_builder::{FixedPropertyConfig, TableMappingBuilder, TableMappingConfig};
pub use type_id::TypeId;
