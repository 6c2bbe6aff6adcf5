//! # semdb query
//!
//! Turns inline query executions into facts that diff like any other
//! annotation.
//!
//! - [`QueryParams`] splits raw parser-function parameters
//! - [`Query`] holds what is stored: string, size, depth, format
//! - [`HashIdGenerator`] names the query sub-object by content hash
//! - [`QueryFactExtractor`] writes the sub-object and links it from the page

pub mod error;
pub mod extractor;
pub mod id;
pub mod params;
pub mod query;

pub use error::{QueryError, Result};
pub use extractor::QueryFactExtractor;
pub use id::HashIdGenerator;
pub use params::QueryParams;
pub use query::Query;
