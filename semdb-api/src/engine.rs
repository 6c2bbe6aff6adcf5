//! Engine facade
//!
//! Wires configuration into a table schema, a store, a job queue and a
//! dispatcher, and hands out [`ParserData`] contexts bound to them.
//!
//! Observer order matters: the dependents observer must compare the stored
//! property type before the store updater overwrites it inline.

use crate::config::SemdbConfig;
use crate::error::{ApiError, Result};
use semdb_core::{DataValueFactory, Error, Subject, TableMappingBuilder, TableMappingConfig, TableSchema};
use semdb_query::{HashIdGenerator, Query, QueryFactExtractor};
use semdb_store::{MemoryStore, SemanticStore};
use semdb_transact::{
    DependentsObserver, DocumentSource, JobRunner, MemoryJobQueue, ParserData, ParserOutput,
    RunStats, SchemaHandle, StoreUpdater, UpdateDispatcher,
};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span};

#[derive(Debug)]
pub struct Engine {
    config: SemdbConfig,
    schema: SchemaHandle,
    store: Arc<dyn SemanticStore>,
    queue: Arc<MemoryJobQueue>,
    dispatcher: UpdateDispatcher,
    runner: JobRunner,
    factory: DataValueFactory,
}

fn build_schema(config: &TableMappingConfig) -> Result<Arc<TableSchema>> {
    let mut builder = TableMappingBuilder::new(config.clone());
    builder.build()?;
    builder
        .schema()
        .ok_or_else(|| ApiError::Core(Error::config("table mapping produced no schema")))
}

impl Engine {
    /// Engine over an in-memory store
    pub fn new(config: SemdbConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Engine over a config file, with environment overrides applied
    pub fn from_config_file(path: &Path) -> Result<Self> {
        Self::new(SemdbConfig::load(path)?)
    }

    /// Engine over a caller-provided store
    pub fn with_store(config: SemdbConfig, store: Arc<dyn SemanticStore>) -> Result<Self> {
        let span = info_span!("engine_init", prefix = %config.schema.table_prefix);
        let _guard = span.enter();

        let schema = SchemaHandle::new(build_schema(&config.schema)?);

        let mut factory = DataValueFactory::new();
        for (label, type_id) in config.declared_properties()? {
            factory.declare(label, type_id);
        }

        let queue = Arc::new(MemoryJobQueue::new());
        let dispatcher = UpdateDispatcher::new()
            .with_observer(Arc::new(DependentsObserver::new(store.clone(), queue.clone())))
            .with_observer(Arc::new(StoreUpdater::new(
                store.clone(),
                schema.clone(),
                queue.clone(),
            )));
        let runner = JobRunner::new(store.clone(), schema.clone(), dispatcher.clone());

        info!(
            tables = schema.current().definitions().len(),
            update_jobs = config.updates.enable_update_jobs,
            "engine ready"
        );
        Ok(Self {
            config,
            schema,
            store,
            queue,
            dispatcher,
            runner,
            factory,
        })
    }

    /// Attach the document source used to re-parse pages in refresh jobs
    pub fn with_source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.runner = self.runner.with_source(source);
        self
    }

    pub fn config(&self) -> &SemdbConfig {
        &self.config
    }

    pub fn schema(&self) -> Arc<TableSchema> {
        self.schema.current()
    }

    pub fn store(&self) -> &Arc<dyn SemanticStore> {
        &self.store
    }

    pub fn factory(&self) -> &DataValueFactory {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut DataValueFactory {
        &mut self.factory
    }

    /// Jobs waiting in the queue
    pub fn pending_jobs(&self) -> usize {
        self.queue.len()
    }

    /// Processing context for one page, bound to this engine's dispatcher
    pub fn parser_data(&self, subject: Subject, output: ParserOutput) -> ParserData {
        let mut parser_data = ParserData::new(subject, output);
        parser_data.set_dispatcher(self.dispatcher.clone());
        if !self.config.updates.enable_update_jobs {
            parser_data.disable_update_jobs();
        }
        parser_data
    }

    /// Interpret an annotation and add it to the page container
    ///
    /// Returns whether the value was stored; rejected values leave an error
    /// on the container.
    pub fn annotate(&self, parser_data: &mut ParserData, label: &str, text: &str) -> bool {
        let value = self.factory.new_property_value(label, text);
        parser_data.add_property_value(&value)
    }

    /// Record an inline query on the page, returning its sub-object subject
    pub fn record_query<S: AsRef<str>>(&self, parser_data: &mut ParserData, raw: &[S]) -> Result<Subject> {
        let query = Query::from_raw(raw)?;
        let mut extractor = QueryFactExtractor::new(parser_data.subject().clone());
        extractor.set_query_id(&HashIdGenerator::new(raw))?;
        extractor.add(&query)?;
        extractor.commit_into(parser_data.data_mut())?;
        let subject = extractor.container()?.subject().clone();
        debug!(subject = %subject, format = %query.format, "query recorded");
        Ok(subject)
    }

    /// Publish the container to the parse result and update the store
    ///
    /// Returns false when observers failed; details are on
    /// [`ParserData::last_report`].
    pub async fn commit(&self, parser_data: &mut ParserData) -> bool {
        parser_data.update_output();
        parser_data.update_store().await
            && parser_data
                .last_report()
                .map(|report| report.is_success())
                .unwrap_or(false)
    }

    /// Remove the page from the store
    pub async fn delete(&self, parser_data: &mut ParserData) -> bool {
        parser_data.delete_from_store().await
            && parser_data
                .last_report()
                .map(|report| report.is_success())
                .unwrap_or(false)
    }

    /// Run every job currently queued
    pub async fn run_pending_jobs(&self) -> RunStats {
        let jobs = self.queue.drain().await;
        if jobs.is_empty() {
            return RunStats::default();
        }
        self.runner.run_all(jobs).await
    }

    /// Run queued jobs in the background
    pub fn spawn_worker(&self) -> JoinHandle<()> {
        self.runner.clone().spawn_worker((*self.queue).clone())
    }

    /// Rebuild the table schema from new configuration
    ///
    /// The current schema stays in place when the new one fails to build.
    /// Stored rows are not moved. They stay readable, and a later write of
    /// their page deletes them from the table they were written to.
    pub fn rebuild_schema(&mut self, schema_config: TableMappingConfig) -> Result<Arc<TableSchema>> {
        let schema = build_schema(&schema_config)?;
        let previous = self.schema.replace(schema.clone());
        info!(
            prefix = %schema_config.table_prefix,
            before = previous.definitions().len(),
            after = schema.definitions().len(),
            "schema rebuilt"
        );
        self.config.schema = schema_config;
        Ok(schema)
    }
}
