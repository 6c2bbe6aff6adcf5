//! Update dispatch
//!
//! Decouples "facts are ready" from "facts are committed". The parser side
//! hands a [`DispatchState`] and a detached snapshot to an [`UpdateDispatcher`];
//! every registered [`UpdateObserver`] reacts on its own (write inline,
//! enqueue a job, enqueue dependent refreshes).
//!
//! Observers are notified in registration order. A failing observer is
//! recorded in the [`DispatchReport`] and never stops the ones after it.

use crate::error::Result;
use async_trait::async_trait;
use semdb_core::{SemanticData, Subject};
use serde::Serialize;
use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info_span, warn, Instrument};

/// State token delivered to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchState {
    /// Bring the store in line with the snapshot
    RunStoreUpdater,
    /// The page is gone; remove everything stored for it
    RunStoreDelete,
}

impl DispatchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchState::RunStoreUpdater => "runStoreUpdater",
            DispatchState::RunStoreDelete => "runStoreDelete",
        }
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What observers receive along with the state
#[derive(Debug, Clone)]
pub struct DispatchContext {
    /// Page the update is for
    pub subject: Subject,
    /// Detached, immutable snapshot of the parsed data
    pub data: Arc<SemanticData>,
    /// Whether deferred jobs may be enqueued (false inside a job)
    pub update_jobs: bool,
}

impl DispatchContext {
    pub fn new(data: Arc<SemanticData>, update_jobs: bool) -> Self {
        Self {
            subject: data.subject().clone(),
            data,
            update_jobs,
        }
    }
}

/// Reacts to dispatched states
#[async_trait]
pub trait UpdateObserver: Debug + Send + Sync {
    /// Name used in reports and logs
    fn name(&self) -> &str;

    async fn notify(&self, state: DispatchState, ctx: &DispatchContext) -> Result<()>;
}

/// A single observer failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObserverFailure {
    pub observer: String,
    pub message: String,
}

/// Result of one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub state: DispatchState,
    /// Observers that completed without error
    pub succeeded: usize,
    pub failures: Vec<ObserverFailure>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line summary of all failures
    pub fn failure_summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("{}: {}", f.observer, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Ordered list of observers for one document-processing context
#[derive(Debug, Clone, Default)]
pub struct UpdateDispatcher {
    observers: Vec<Arc<dyn UpdateObserver>>,
}

impl UpdateDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; observers run in registration order
    pub fn register(&mut self, observer: Arc<dyn UpdateObserver>) {
        self.observers.push(observer);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_observer(mut self, observer: Arc<dyn UpdateObserver>) -> Self {
        self.register(observer);
        self
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Notify every observer of `state`
    pub async fn dispatch(&self, state: DispatchState, ctx: &DispatchContext) -> DispatchReport {
        let span = info_span!(
            "dispatch",
            state = %state,
            subject = %ctx.subject,
            update_jobs = ctx.update_jobs,
            observers = self.observers.len(),
        );

        async {
            let mut report = DispatchReport {
                state,
                succeeded: 0,
                failures: Vec::new(),
            };
            for observer in &self.observers {
                match observer.notify(state, ctx).await {
                    Ok(()) => {
                        debug!(observer = observer.name(), "observer notified");
                        report.succeeded += 1;
                    }
                    Err(e) => {
                        warn!(observer = observer.name(), error = %e, "observer failed");
                        report.failures.push(ObserverFailure {
                            observer: observer.name().to_string(),
                            message: e.to_string(),
                        });
                    }
                }
            }
            report
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransactError;
    use parking_lot::Mutex;

    #[derive(Debug, Default)]
    struct Recorder {
        name: String,
        fail: bool,
        seen: Mutex<Vec<(DispatchState, bool)>>,
    }

    impl Recorder {
        fn new(name: &str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                fail,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl UpdateObserver for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        async fn notify(&self, state: DispatchState, ctx: &DispatchContext) -> Result<()> {
            self.seen.lock().push((state, ctx.update_jobs));
            if self.fail {
                return Err(TransactError::queue("queue unavailable"));
            }
            Ok(())
        }
    }

    fn ctx() -> DispatchContext {
        DispatchContext::new(Arc::new(SemanticData::new(Subject::page("Berlin"))), true)
    }

    #[tokio::test]
    async fn test_all_observers_notified() {
        let a = Recorder::new("a", false);
        let b = Recorder::new("b", false);
        let dispatcher = UpdateDispatcher::new()
            .with_observer(a.clone())
            .with_observer(b.clone());

        let report = dispatcher.dispatch(DispatchState::RunStoreUpdater, &ctx()).await;
        assert!(report.is_success());
        assert_eq!(report.succeeded, 2);
        assert_eq!(a.seen.lock().as_slice(), &[(DispatchState::RunStoreUpdater, true)]);
        assert_eq!(b.seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_others() {
        let failing = Recorder::new("failing", true);
        let after = Recorder::new("after", false);
        let dispatcher = UpdateDispatcher::new()
            .with_observer(failing)
            .with_observer(after.clone());

        let report = dispatcher.dispatch(DispatchState::RunStoreUpdater, &ctx()).await;
        assert!(!report.is_success());
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failures[0].observer, "failing");
        assert!(report.failure_summary().contains("queue unavailable"));
        assert_eq!(after.seen.lock().len(), 1);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(DispatchState::RunStoreUpdater.to_string(), "runStoreUpdater");
    }
}
