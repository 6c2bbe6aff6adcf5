//! # semdb transact
//!
//! Moves parsed semantic data into the store.
//!
//! - [`ParserData`] owns the container of the page being parsed and mirrors
//!   it into the [`ParserOutput`]
//! - [`UpdateDispatcher`] delivers a [`DispatchState`] and a detached snapshot
//!   to registered [`UpdateObserver`]s
//! - [`StoreUpdater`] writes inline or enqueues an [`UpdateJob`];
//!   [`DependentsObserver`] enqueues refreshes after a property type change
//! - [`JobRunner`] executes jobs with update jobs disabled
//!
//! ## Example
//!
//! ```ignore
//! let mut parser_data = ParserData::new(subject, output);
//! parser_data.add_property_value(&factory.new_property_value("Population", "9,001"));
//! parser_data.set_dispatcher(dispatcher.clone());
//! parser_data.update_output();
//! parser_data.update_store().await;
//! ```

pub mod dependents;
pub mod dispatch;
pub mod error;
pub mod job;
pub mod output;
pub mod parser_data;
pub mod runner;
pub mod schema;
pub mod updater;

pub use dependents::DependentsObserver;
pub use dispatch::{
    DispatchContext, DispatchReport, DispatchState, ObserverFailure, UpdateDispatcher,
    UpdateObserver,
};
pub use error::{Result, TransactError};
pub use job::{JobPayload, JobQueue, MemoryJobQueue, UpdateJob};
pub use output::ParserOutput;
pub use parser_data::ParserData;
pub use runner::{DocumentSource, JobReport, JobRunner, RunStats};
pub use schema::SchemaHandle;
pub use updater::{write_snapshot, StoreUpdater};
