//! # semdb api
//!
//! Entry point for hosts: load configuration, set up logging, and drive page
//! updates through an [`Engine`].
//!
//! ## Example
//!
//! ```ignore
//! let config = SemdbConfig::load(Path::new("semdb.toml"))?;
//! init_logging(&TelemetryConfig::from_config(&config.logging));
//!
//! let engine = Engine::new(config)?;
//! let mut parser_data = engine.parser_data(Subject::page("Berlin"), ParserOutput::new(text));
//! engine.annotate(&mut parser_data, "Population", "3,520,031");
//! engine.record_query(&mut parser_data, &["[[Located in::Germany]]", "format=list"])?;
//! engine.commit(&mut parser_data).await;
//! engine.run_pending_jobs().await;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;

pub use config::{LogFormat, LoggingConfig, SemdbConfig, UpdatesConfig};
pub use engine::Engine;
pub use error::{ApiError, Result};
pub use telemetry::{fmt_layer, init_logging, TelemetryConfig};

pub use semdb_core::{
    DataItem, DataItemType, DataValue, Property, SemanticData, Subject, TableMappingConfig,
    TableSchema, TypeId,
};
pub use semdb_store::{MemoryStore, SemanticStore};
pub use semdb_transact::{DocumentSource, ParserData, ParserOutput, RunStats};
