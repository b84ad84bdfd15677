//! In-memory workflow journal.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::events::WorkflowEvent;
use crate::run::WorkflowRun;

/// Number of runs kept by [`WorkflowJournal::new`].
pub const DEFAULT_JOURNAL_CAPACITY: usize = 1024;

#[derive(Default)]
struct Runs {
    events: HashMap<Uuid, Vec<WorkflowEvent>>,
    order: VecDeque<Uuid>,
}

/// Append-only record of the most recent workflow runs, keyed by run id.
///
/// Once more than `capacity` runs have been journaled, the oldest run is
/// evicted.
#[derive(Clone)]
pub struct WorkflowJournal {
    runs: Arc<RwLock<Runs>>,
    capacity: usize,
}

impl Default for WorkflowJournal {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAPACITY)
    }
}

impl WorkflowJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            runs: Arc::new(RwLock::new(Runs::default())),
            capacity: capacity.max(1),
        }
    }

    pub async fn append(&self, run_id: Uuid, event: WorkflowEvent) {
        let mut runs = self.runs.write().await;
        if !runs.events.contains_key(&run_id) {
            runs.order.push_back(run_id);
            while runs.order.len() > self.capacity {
                if let Some(evicted) = runs.order.pop_front() {
                    runs.events.remove(&evicted);
                    tracing::trace!(run_id = %evicted, "evicted workflow run from journal");
                }
            }
        }
        runs.events.entry(run_id).or_default().push(event);
    }

    /// The events of one run, in append order.
    pub async fn events(&self, run_id: Uuid) -> Vec<WorkflowEvent> {
        self.runs
            .read()
            .await
            .events
            .get(&run_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Rebuilds a run from its events.
    pub async fn get_run(&self, run_id: Uuid) -> Option<WorkflowRun> {
        let events = self.events(run_id).await;
        if events.is_empty() {
            return None;
        }
        Some(WorkflowRun::from_events(events))
    }

    pub async fn run_count(&self) -> usize {
        self.runs.read().await.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::WorkflowKind;
    use crate::state::WorkflowState;

    #[tokio::test]
    async fn test_append_and_replay() {
        let journal = WorkflowJournal::new();
        let run_id = Uuid::new_v4();
        journal
            .append(run_id, WorkflowEvent::workflow_started(run_id, WorkflowKind::SignOut))
            .await;
        journal.append(run_id, WorkflowEvent::workflow_completed()).await;

        assert_eq!(journal.events(run_id).await.len(), 2);
        let run = journal.get_run(run_id).await.unwrap();
        assert_eq!(run.state(), WorkflowState::Completed);
        assert_eq!(journal.run_count().await, 1);
    }

    #[tokio::test]
    async fn test_oldest_runs_are_evicted() {
        let journal = WorkflowJournal::with_capacity(3);
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            journal
                .append(*id, WorkflowEvent::workflow_started(*id, WorkflowKind::SignOut))
                .await;
            journal.append(*id, WorkflowEvent::workflow_completed()).await;
        }

        assert_eq!(journal.run_count().await, 3);
        assert!(journal.get_run(ids[0]).await.is_none());
        assert!(journal.get_run(ids[1]).await.is_none());
        let newest = journal.get_run(ids[4]).await.unwrap();
        assert_eq!(newest.state(), WorkflowState::Completed);
        assert_eq!(journal.events(ids[2]).await.len(), 2);
    }

    #[tokio::test]
    async fn test_default_capacity_bounds_the_journal() {
        let journal = WorkflowJournal::new();
        for _ in 0..DEFAULT_JOURNAL_CAPACITY + 10 {
            journal.append(Uuid::new_v4(), WorkflowEvent::workflow_completed()).await;
        }
        assert_eq!(journal.run_count().await, DEFAULT_JOURNAL_CAPACITY);
    }

    #[tokio::test]
    async fn test_unknown_run() {
        let journal = WorkflowJournal::new();
        assert!(journal.get_run(Uuid::new_v4()).await.is_none());
    }
}
