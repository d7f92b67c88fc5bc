//! In-memory store for tests and local benchmarking.
//!
//! This provides a [`MetadataStore`] backed by plain collections. The store
//! is [`Clone`] so tests can hold a handle for direct inspection while the
//! workload owns another.

use std::sync::{Arc, Mutex};

use metabench_types::{Artifact, Event, EventType, Execution, Node};

use crate::{MetadataStore, StoreResult};

#[derive(Debug, Default)]
struct Inner {
    artifacts: Vec<Node>,
    executions: Vec<Node>,
    events: Vec<Event>,
}

/// A [`MetadataStore`] backed by in-memory collections.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    /// Creates a store pre-populated with sequentially numbered nodes.
    ///
    /// Artifact ids are `1..=num_artifacts` and execution ids are
    /// `1..=num_executions`; id spaces are independent per node kind.
    pub fn with_population(num_artifacts: i64, num_executions: i64) -> Self {
        let inner = Inner {
            artifacts: (1..=num_artifacts)
                .map(|id| Node::Artifact(Artifact { id }))
                .collect(),
            executions: (1..=num_executions)
                .map(|id| Node::Execution(Execution { id }))
                .collect(),
            events: Vec::new(),
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Records an event directly, bypassing the [`MetadataStore`] trait.
    ///
    /// Useful for seeding persisted state, e.g. a pre-existing output event
    /// that a later workload run must not duplicate.
    pub fn seed_event(&self, event: Event) {
        self.inner.lock().unwrap().events.push(event);
    }

    /// Returns a snapshot of all persisted events.
    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().unwrap().events.clone()
    }

    /// Returns the number of persisted output events targeting the artifact.
    pub fn output_events_for(&self, artifact_id: i64) -> usize {
        self.inner
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|event| {
                event.event_type == EventType::Output && event.artifact_id == artifact_id
            })
            .count()
    }
}

#[async_trait::async_trait]
impl MetadataStore for InMemoryStore {
    async fn existing_nodes(&self) -> StoreResult<(Vec<Node>, Vec<Node>)> {
        let inner = self.inner.lock().unwrap();
        Ok((inner.artifacts.clone(), inner.executions.clone()))
    }

    async fn events_by_artifact(&self, artifact_id: i64) -> StoreResult<Vec<Event>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .events
            .iter()
            .filter(|event| event.artifact_id == artifact_id)
            .cloned()
            .collect())
    }

    async fn put_events(&self, events: &[Event]) -> StoreResult<()> {
        self.inner.lock().unwrap().events.extend_from_slice(events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use metabench_types::{EventPath, PathStep};

    use super::*;

    fn make_event(event_type: EventType, artifact_id: i64, execution_id: i64) -> Event {
        Event {
            event_type,
            artifact_id,
            execution_id,
            path: EventPath {
                steps: vec![PathStep::new("foo")],
            },
        }
    }

    #[tokio::test]
    async fn populates_sequential_node_ids() {
        let store = InMemoryStore::with_population(3, 2);

        let (artifacts, executions) = store.existing_nodes().await.unwrap();

        let artifact_ids: Vec<_> = artifacts.iter().map(Node::id).collect();
        let execution_ids: Vec<_> = executions.iter().map(Node::id).collect();
        assert_eq!(artifact_ids, vec![1, 2, 3]);
        assert_eq!(execution_ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn queries_events_per_artifact() {
        let store = InMemoryStore::with_population(2, 1);
        store
            .put_events(&[
                make_event(EventType::Input, 1, 1),
                make_event(EventType::Output, 2, 1),
                make_event(EventType::Input, 1, 1),
            ])
            .await
            .unwrap();

        let events = store.events_by_artifact(1).await.unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|event| event.artifact_id == 1));

        assert_eq!(store.output_events_for(2), 1);
        assert!(store.events_by_artifact(99).await.unwrap().is_empty());
    }
}
