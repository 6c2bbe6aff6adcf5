//! Update jobs and the job queue seam
//!
//! Enqueueing is fire-and-forget: the queue owns the job once `enqueue`
//! returns. Jobs carry a detached snapshot (`Snapshot`) or just the subject
//! (`Refresh`, which re-parses the page when run).

use crate::error::{Result, TransactError};
use async_trait::async_trait;
use semdb_core::{SemanticData, Subject};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// Work carried by a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum JobPayload {
    /// Write this snapshot; the diff is recomputed against the store at run time
    Snapshot(SemanticData),
    /// Re-parse the page and store the result
    Refresh,
}

/// A deferred store update for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateJob {
    pub subject: Subject,
    pub payload: JobPayload,
}

impl UpdateJob {
    /// Job writing a detached snapshot
    pub fn snapshot(data: &SemanticData) -> Self {
        Self {
            subject: data.subject().clone(),
            payload: JobPayload::Snapshot(data.clone()),
        }
    }

    /// Job re-processing a page
    pub fn refresh(subject: Subject) -> Self {
        Self {
            subject,
            payload: JobPayload::Refresh,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self.payload {
            JobPayload::Snapshot(_) => "snapshot",
            JobPayload::Refresh => "refresh",
        }
    }

    /// Encode for an external queue
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a job read from an external queue
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Job queue substrate
#[async_trait]
pub trait JobQueue: Debug + Send + Sync {
    async fn enqueue(&self, job: UpdateJob) -> Result<()>;
}

/// In-process queue backed by an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct MemoryJobQueue {
    tx: mpsc::UnboundedSender<UpdateJob>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<UpdateJob>>>,
    pending: Arc<AtomicUsize>,
}

impl Default for MemoryJobQueue {
    fn default() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs enqueued and not yet taken
    pub fn len(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take every job currently queued, in enqueue order
    pub async fn drain(&self) -> Vec<UpdateJob> {
        let mut rx = self.rx.lock().await;
        let mut jobs = Vec::new();
        while let Ok(job) = rx.try_recv() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            jobs.push(job);
        }
        jobs
    }

    /// Wait for the next job
    ///
    /// Returns `None` once every sender is gone, which cannot happen while
    /// this queue is alive since it holds a sender itself.
    pub async fn recv(&self) -> Option<UpdateJob> {
        let job = self.rx.lock().await.recv().await;
        if job.is_some() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
        }
        job
    }
}

#[async_trait]
impl JobQueue for MemoryJobQueue {
    async fn enqueue(&self, job: UpdateJob) -> Result<()> {
        debug!(subject = %job.subject, kind = job.kind(), "job enqueued");
        self.pending.fetch_add(1, Ordering::AcqRel);
        self.tx.send(job).map_err(|e| {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            TransactError::queue(format!("queue closed: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semdb_core::{DataItem, Property};

    #[tokio::test]
    async fn test_enqueue_drain_in_order() {
        let queue = MemoryJobQueue::new();
        queue.enqueue(UpdateJob::refresh(Subject::page("A"))).await.unwrap();
        queue.enqueue(UpdateJob::refresh(Subject::page("B"))).await.unwrap();
        assert_eq!(queue.len(), 2);

        let jobs = queue.drain().await;
        let subjects: Vec<_> = jobs.iter().map(|j| j.subject.dbkey.to_string()).collect();
        assert_eq!(subjects, vec!["A", "B"]);
        assert!(queue.is_empty());
        assert!(queue.drain().await.is_empty());
    }

    #[test]
    fn test_snapshot_job_detached_and_encodable() {
        let mut data = SemanticData::new(Subject::page("Berlin"));
        data.add_value(Property::user("Country"), DataItem::page(Subject::page("Germany")));
        let job = UpdateJob::snapshot(&data);

        // Later mutation of the source does not reach the job
        data.clear();
        let JobPayload::Snapshot(ref payload) = job.payload else {
            panic!("expected snapshot payload");
        };
        assert_eq!(payload.fact_count(), 1);

        let decoded = UpdateJob::from_bytes(&job.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.subject, job.subject);
        assert_eq!(decoded.kind(), "snapshot");
    }

    #[test]
    fn test_snapshot_with_hash_titles_survives_encoding() {
        let page = Subject::new(0, "C#");
        let mut data = SemanticData::new(page.clone());
        data.add_value(
            Property::user("See also"),
            DataItem::page(Subject::page("F#").with_subobject("syntax#1")),
        );
        let mut part = SemanticData::new(page.with_subobject("part#2"));
        part.add_value(Property::user("Name"), DataItem::blob("a#b#c"));
        data.add_subobject(part).unwrap();

        let job = UpdateJob::snapshot(&data);
        let decoded = UpdateJob::from_bytes(&job.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, job);
        assert_eq!(&*decoded.subject.dbkey, "C#");
        let JobPayload::Snapshot(payload) = decoded.payload else {
            panic!("expected snapshot payload");
        };
        assert_eq!(payload.facts(), data.facts());
        assert!(payload.subobject("part#2").is_some());
    }
}
