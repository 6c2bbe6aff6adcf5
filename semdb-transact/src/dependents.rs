//! Dependent re-processing
//!
//! When the declared type of a property changes, every page that stores a
//! value for it was parsed under the old type. This observer compares the
//! `_TYPE` values of a property page with the stored ones and enqueues a
//! `Refresh` job for each dependent page.
//!
//! Must be registered before the store updater, so it still sees the
//! previously stored type when the updater writes inline.

use crate::dispatch::{DispatchContext, DispatchState, UpdateObserver};
use crate::error::Result;
use crate::job::{JobQueue, UpdateJob};
use async_trait::async_trait;
use semdb_core::{DataItem, Property};
use semdb_store::SemanticStore;
use semdb_vocab::{namespaces, props};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct DependentsObserver {
    store: Arc<dyn SemanticStore>,
    queue: Arc<dyn JobQueue>,
}

impl DependentsObserver {
    pub fn new(store: Arc<dyn SemanticStore>, queue: Arc<dyn JobQueue>) -> Self {
        Self { store, queue }
    }
}

fn declared_types(values: Vec<&DataItem>) -> BTreeSet<DataItem> {
    values.into_iter().cloned().collect()
}

#[async_trait]
impl UpdateObserver for DependentsObserver {
    fn name(&self) -> &str {
        "dependents"
    }

    async fn notify(&self, state: DispatchState, ctx: &DispatchContext) -> Result<()> {
        if ctx.subject.namespace != namespaces::PROPERTY || ctx.subject.is_subobject() {
            return Ok(());
        }
        if !ctx.update_jobs {
            // Inside a job: no further fan-out
            debug!(subject = %ctx.subject, "dependent refresh skipped");
            return Ok(());
        }

        let has_type = Property::new(props::HAS_TYPE);
        let previous = self.store.semantic_data(&ctx.subject).await?;
        let before = declared_types(previous.property_values(&has_type));
        let after = match state {
            DispatchState::RunStoreUpdater => declared_types(ctx.data.property_values(&has_type)),
            DispatchState::RunStoreDelete => BTreeSet::new(),
        };
        if before == after {
            return Ok(());
        }

        // Property keys are the normalized titles of their pages
        let key = ctx.subject.dbkey.to_string();
        let dependents = self.store.subjects_using(&key).await?;
        info!(
            property = %key,
            dependents = dependents.len(),
            "property type changed"
        );
        for subject in dependents {
            if subject == ctx.subject {
                continue;
            }
            self.queue.enqueue(UpdateJob::refresh(subject)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobPayload, MemoryJobQueue};
    use crate::schema::SchemaHandle;
    use crate::updater::write_snapshot;
    use semdb_core::{SemanticData, Subject, TableMappingBuilder, TableMappingConfig, TypeId};
    use semdb_store::MemoryStore;

    fn property_page(type_id: Option<TypeId>) -> SemanticData {
        let mut data = SemanticData::new(Subject::property_page("Population"));
        if let Some(t) = type_id {
            data.add_value(Property::new(props::HAS_TYPE), DataItem::blob(t.as_str()));
        }
        data
    }

    async fn setup() -> (Arc<MemoryStore>, Arc<MemoryJobQueue>, SchemaHandle) {
        let mut builder = TableMappingBuilder::new(TableMappingConfig::default());
        builder.build().unwrap();
        let schema = SchemaHandle::new(builder.schema().unwrap());
        let store = Arc::new(MemoryStore::new());

        let mut berlin = SemanticData::new(Subject::page("Berlin"));
        berlin.add_value(Property::user("Population"), DataItem::page(Subject::page("Many")));
        write_snapshot(store.as_ref(), &schema, &berlin).await.unwrap();
        write_snapshot(store.as_ref(), &schema, &property_page(Some(TypeId::Page)))
            .await
            .unwrap();

        (store, Arc::new(MemoryJobQueue::new()), schema)
    }

    #[tokio::test]
    async fn test_type_change_enqueues_refresh() {
        let (store, queue, _schema) = setup().await;
        let observer = DependentsObserver::new(store, queue.clone());

        let ctx = DispatchContext::new(Arc::new(property_page(Some(TypeId::Number))), true);
        observer.notify(DispatchState::RunStoreUpdater, &ctx).await.unwrap();

        let jobs = queue.drain().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].subject, Subject::page("Berlin"));
        assert_eq!(jobs[0].payload, JobPayload::Refresh);
    }

    #[tokio::test]
    async fn test_unchanged_type_or_job_context_is_quiet() {
        let (store, queue, _schema) = setup().await;
        let observer = DependentsObserver::new(store, queue.clone());

        let same = DispatchContext::new(Arc::new(property_page(Some(TypeId::Page))), true);
        observer.notify(DispatchState::RunStoreUpdater, &same).await.unwrap();

        let in_job = DispatchContext::new(Arc::new(property_page(Some(TypeId::Number))), false);
        observer.notify(DispatchState::RunStoreUpdater, &in_job).await.unwrap();

        let page = DispatchContext::new(Arc::new(SemanticData::new(Subject::page("Berlin"))), true);
        observer.notify(DispatchState::RunStoreUpdater, &page).await.unwrap();

        assert!(queue.is_empty());
    }
}
