//! Job execution
//!
//! A [`JobRunner`] executes update jobs with update jobs disabled, so nothing
//! it does can enqueue more store writes for the same page.
//!
//! - `Snapshot`: diff the carried snapshot against the store and apply it
//! - `Refresh`: re-parse the page through the host [`DocumentSource`] and
//!   dispatch the result synchronously

use crate::dispatch::UpdateDispatcher;
use crate::error::{Result, TransactError};
use crate::job::{JobPayload, MemoryJobQueue, UpdateJob};
use crate::output::ParserOutput;
use crate::parser_data::ParserData;
use crate::schema::SchemaHandle;
use crate::updater::write_snapshot;
use async_trait::async_trait;
use semdb_core::Subject;
use semdb_store::{SemanticStore, WriteSummary};
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, info_span, warn, Instrument};

/// Host document model: re-parses pages for refresh jobs
#[async_trait]
pub trait DocumentSource: Debug + Send + Sync {
    /// Parse the current revision of a page
    ///
    /// Returns `None` when the page no longer exists.
    async fn parse(&self, subject: &Subject) -> Result<Option<ParserOutput>>;
}

/// Outcome of one successful job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    pub subject: Subject,
    pub kind: &'static str,
    /// Write summary, for jobs that write directly
    pub written: Option<WriteSummary>,
}

/// Totals of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct JobRunner {
    store: Arc<dyn SemanticStore>,
    schema: SchemaHandle,
    dispatcher: UpdateDispatcher,
    source: Option<Arc<dyn DocumentSource>>,
}

impl JobRunner {
    pub fn new(store: Arc<dyn SemanticStore>, schema: SchemaHandle, dispatcher: UpdateDispatcher) -> Self {
        Self {
            store,
            schema,
            dispatcher,
            source: None,
        }
    }

    /// Attach the document source used by refresh jobs
    pub fn with_source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Run one job
    pub async fn run(&self, job: UpdateJob) -> Result<JobReport> {
        let span = info_span!("update_job", subject = %job.subject, kind = job.kind());
        async move {
            let kind = job.kind();
            let written = match job.payload {
                JobPayload::Snapshot(data) => {
                    Some(write_snapshot(self.store.as_ref(), &self.schema, &data).await?)
                }
                JobPayload::Refresh => {
                    self.refresh(&job.subject).await?;
                    None
                }
            };
            Ok(JobReport {
                subject: job.subject,
                kind,
                written,
            })
        }
        .instrument(span)
        .await
    }

    async fn refresh(&self, subject: &Subject) -> Result<()> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| TransactError::no_source("refresh jobs need a document source"))?;
        let output = source
            .parse(subject)
            .await?
            .ok_or_else(|| TransactError::page_not_found(subject.to_string()))?;

        let mut parser_data = ParserData::new(subject.clone(), output);
        parser_data.disable_update_jobs();
        parser_data.set_dispatcher(self.dispatcher.clone());
        parser_data.update_store().await;

        match parser_data.last_report() {
            Some(report) if !report.is_success() => {
                Err(TransactError::dispatch(report.failure_summary()))
            }
            _ => Ok(()),
        }
    }

    /// Run jobs in order; failures are logged and counted, never fatal
    pub async fn run_all(&self, jobs: Vec<UpdateJob>) -> RunStats {
        let mut stats = RunStats::default();
        for job in jobs {
            let subject = job.subject.clone();
            match self.run(job).await {
                Ok(_) => stats.succeeded += 1,
                Err(e) => {
                    warn!(subject = %subject, error = %e, "update job failed");
                    stats.failed += 1;
                }
            }
        }
        if stats.succeeded + stats.failed > 0 {
            info!(succeeded = stats.succeeded, failed = stats.failed, "update jobs run");
        }
        stats
    }

    /// Run jobs from the queue in the background until the task is aborted
    pub fn spawn_worker(self, queue: MemoryJobQueue) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(job) = queue.recv().await {
                let subject = job.subject.clone();
                if let Err(e) = self.run(job).await {
                    warn!(subject = %subject, error = %e, "update job failed");
                }
            }
        })
    }
}
