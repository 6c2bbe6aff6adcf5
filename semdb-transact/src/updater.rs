//! Store updater observer
//!
//! Reacts to `RunStoreUpdater` / `RunStoreDelete` by bringing the store in
//! line with the snapshot. With update jobs enabled the write is deferred to a
//! `Snapshot` job; with update jobs disabled (already inside a job) it happens
//! inline.

use crate::dispatch::{DispatchContext, DispatchState, UpdateObserver};
use crate::error::Result;
use crate::job::{JobQueue, UpdateJob};
use crate::schema::SchemaHandle;
use async_trait::async_trait;
use semdb_core::SemanticData;
use semdb_store::{SemanticStore, WriteSummary};
use std::sync::Arc;
use tracing::{debug, info};

/// Diff `data` against what is stored for its page and apply the result
///
/// The diff is recomputed at write time, so applying the same snapshot twice
/// writes nothing the second time.
pub async fn write_snapshot(
    store: &dyn SemanticStore,
    schema: &SchemaHandle,
    data: &SemanticData,
) -> Result<WriteSummary> {
    let schema = schema.current();
    let previous = store.semantic_data(data.subject()).await?;
    let diff = data.diff(&previous);
    if diff.is_empty() {
        debug!(subject = %data.subject(), "snapshot unchanged");
        return Ok(WriteSummary::default());
    }
    let summary = store.apply(&schema, &diff).await?;
    info!(
        subject = %data.subject(),
        inserted = summary.inserted,
        deleted = summary.deleted,
        "store updated"
    );
    Ok(summary)
}

/// Writes snapshots to the store, inline or through a job
#[derive(Debug, Clone)]
pub struct StoreUpdater {
    store: Arc<dyn SemanticStore>,
    schema: SchemaHandle,
    queue: Arc<dyn JobQueue>,
}

impl StoreUpdater {
    pub fn new(store: Arc<dyn SemanticStore>, schema: SchemaHandle, queue: Arc<dyn JobQueue>) -> Self {
        Self {
            store,
            schema,
            queue,
        }
    }
}

#[async_trait]
impl UpdateObserver for StoreUpdater {
    fn name(&self) -> &str {
        "store_updater"
    }

    async fn notify(&self, state: DispatchState, ctx: &DispatchContext) -> Result<()> {
        let data = match state {
            DispatchState::RunStoreUpdater => ctx.data.clone(),
            DispatchState::RunStoreDelete => Arc::new(SemanticData::new(ctx.subject.base())),
        };

        if ctx.update_jobs {
            self.queue.enqueue(UpdateJob::snapshot(&data)).await?;
            debug!(subject = %ctx.subject, "store update deferred");
            return Ok(());
        }

        write_snapshot(self.store.as_ref(), &self.schema, &data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobPayload, MemoryJobQueue};
    use semdb_core::{DataItem, Property, Subject, TableMappingBuilder, TableMappingConfig};
    use semdb_store::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, Arc<MemoryJobQueue>, StoreUpdater) {
        let mut builder = TableMappingBuilder::new(TableMappingConfig::default());
        builder.build().unwrap();
        let store = Arc::new(MemoryStore::new());
        let queue = Arc::new(MemoryJobQueue::new());
        let updater = StoreUpdater::new(
            store.clone(),
            SchemaHandle::new(builder.schema().unwrap()),
            queue.clone(),
        );
        (store, queue, updater)
    }

    fn berlin() -> Arc<SemanticData> {
        let mut data = SemanticData::new(Subject::page("Berlin"));
        data.add_value(Property::user("Country"), DataItem::page(Subject::page("Germany")));
        Arc::new(data)
    }

    #[tokio::test]
    async fn test_inline_write_when_jobs_disabled() {
        let (store, queue, updater) = setup();
        let ctx = DispatchContext::new(berlin(), false);
        updater.notify(DispatchState::RunStoreUpdater, &ctx).await.unwrap();

        assert_eq!(store.row_count(), 1);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_deferred_write_enqueues_snapshot() {
        let (store, queue, updater) = setup();
        let ctx = DispatchContext::new(berlin(), true);
        updater.notify(DispatchState::RunStoreUpdater, &ctx).await.unwrap();

        assert_eq!(store.row_count(), 0);
        let jobs = queue.drain().await;
        assert_eq!(jobs.len(), 1);
        assert!(matches!(jobs[0].payload, JobPayload::Snapshot(_)));
    }

    #[tokio::test]
    async fn test_delete_clears_page() {
        let (store, _queue, updater) = setup();
        let ctx = DispatchContext::new(berlin(), false);
        updater.notify(DispatchState::RunStoreUpdater, &ctx).await.unwrap();
        updater.notify(DispatchState::RunStoreDelete, &ctx).await.unwrap();
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn test_write_snapshot_twice_is_noop() {
        let (store, _queue, updater) = setup();
        let data = berlin();
        let first = write_snapshot(store.as_ref(), &updater.schema, &data).await.unwrap();
        assert_eq!(first.inserted, 1);
        let second = write_snapshot(store.as_ref(), &updater.schema, &data).await.unwrap();
        assert_eq!(second, WriteSummary::default());
    }
}
