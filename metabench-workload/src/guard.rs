//! Enforcement of the single-output-event-per-artifact invariant.
//!
//! The invariant spans two sources of truth: events generated earlier in the
//! current run (the in-run registry) and events already persisted in the
//! store. The guard unifies both behind one
//! [`check_and_register`](OutputArtifactGuard::check_and_register) call so
//! the batch builder never reasons about them separately.

use std::collections::HashSet;

use metabench_store::{MetadataStore, StoreError};
use metabench_types::EventType;

use crate::error::{WorkloadError, WorkloadResult};

/// Outcome of an output-artifact check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ArtifactStatus {
    /// The artifact had no output event and is now registered as used.
    Fresh,
    /// The artifact already has an output event, either in this run or
    /// persisted in the store.
    AlreadyUsed,
}

/// Tracks which artifacts already carry an output event.
#[derive(Debug)]
pub(crate) struct OutputArtifactGuard {
    /// Artifacts assigned an output event by this run.
    registered: HashSet<i64>,
    /// Artifacts discovered to have a persisted output event. Cached so the
    /// store is queried at most once per artifact id.
    persisted: HashSet<i64>,
    /// Number of distinct artifact ids in the population.
    population: usize,
}

impl OutputArtifactGuard {
    /// Creates a guard over the given artifact population.
    pub fn new(artifact_ids: &[i64]) -> Self {
        let distinct: HashSet<i64> = artifact_ids.iter().copied().collect();
        Self {
            registered: HashSet::new(),
            persisted: HashSet::new(),
            population: distinct.len(),
        }
    }

    /// The number of distinct artifact ids in the population.
    pub fn population(&self) -> usize {
        self.population
    }

    /// True once every distinct artifact id is known to carry an output
    /// event. At that point rejection sampling can never accept a draw
    /// again, so the batch builder must fail fast instead of spinning.
    pub fn exhausted(&self) -> bool {
        // `registered` and `persisted` are disjoint by construction.
        self.registered.len() + self.persisted.len() >= self.population
    }

    /// Checks whether the artifact may receive an output event and, if so,
    /// claims it for this run.
    ///
    /// The in-run registry is consulted first so known duplicates never cost
    /// a store round-trip. A [`StoreError::NotFound`] from the event query
    /// means "no recorded events", and a [`StoreError::AlreadyExists`] is the
    /// store's own way of reporting a duplicate output assignment; every
    /// other store error is fatal.
    pub async fn check_and_register(
        &mut self,
        artifact_id: i64,
        store: &dyn MetadataStore,
    ) -> WorkloadResult<ArtifactStatus> {
        if self.registered.contains(&artifact_id) || self.persisted.contains(&artifact_id) {
            return Ok(ArtifactStatus::AlreadyUsed);
        }

        let events = match store.events_by_artifact(artifact_id).await {
            Ok(events) => events,
            Err(StoreError::NotFound) => Vec::new(),
            Err(StoreError::AlreadyExists) => {
                self.persisted.insert(artifact_id);
                return Ok(ArtifactStatus::AlreadyUsed);
            }
            Err(err) => return Err(WorkloadError::Store(err)),
        };
        if events
            .iter()
            .any(|event| event.event_type == EventType::Output)
        {
            self.persisted.insert(artifact_id);
            return Ok(ArtifactStatus::AlreadyUsed);
        }

        self.registered.insert(artifact_id);
        Ok(ArtifactStatus::Fresh)
    }
}

#[cfg(test)]
mod tests {
    use metabench_store::{InMemoryStore, StoreResult};
    use metabench_types::{Event, EventPath, Node, PathStep};

    use super::*;

    /// A store whose event query always fails with the given error.
    #[derive(Debug)]
    struct FailingStore(fn() -> StoreError);

    #[async_trait::async_trait]
    impl MetadataStore for FailingStore {
        async fn existing_nodes(&self) -> StoreResult<(Vec<Node>, Vec<Node>)> {
            Ok((Vec::new(), Vec::new()))
        }

        async fn events_by_artifact(&self, _artifact_id: i64) -> StoreResult<Vec<Event>> {
            Err((self.0)())
        }

        async fn put_events(&self, _events: &[Event]) -> StoreResult<()> {
            Ok(())
        }
    }

    fn make_event(event_type: EventType, artifact_id: i64) -> Event {
        Event {
            event_type,
            artifact_id,
            execution_id: 1,
            path: EventPath {
                steps: vec![PathStep::new("foo")],
            },
        }
    }

    #[tokio::test]
    async fn registers_fresh_artifacts_once() {
        let store = InMemoryStore::with_population(3, 1);
        let mut guard = OutputArtifactGuard::new(&[1, 2, 3]);

        let first = guard.check_and_register(1, &store).await.unwrap();
        let second = guard.check_and_register(1, &store).await.unwrap();

        assert_eq!(first, ArtifactStatus::Fresh);
        assert_eq!(second, ArtifactStatus::AlreadyUsed);
    }

    #[tokio::test]
    async fn rejects_persisted_output_events() {
        let store = InMemoryStore::with_population(3, 1);
        store.seed_event(make_event(EventType::Output, 2));
        let mut guard = OutputArtifactGuard::new(&[1, 2, 3]);

        let status = guard.check_and_register(2, &store).await.unwrap();

        assert_eq!(status, ArtifactStatus::AlreadyUsed);
    }

    #[tokio::test]
    async fn ignores_persisted_input_events() {
        let store = InMemoryStore::with_population(3, 1);
        store.seed_event(make_event(EventType::Input, 2));
        store.seed_event(make_event(EventType::Input, 2));
        let mut guard = OutputArtifactGuard::new(&[1, 2, 3]);

        let status = guard.check_and_register(2, &store).await.unwrap();

        assert_eq!(status, ArtifactStatus::Fresh);
    }

    #[tokio::test]
    async fn store_reported_duplicates_are_the_rejection_signal() {
        let store = FailingStore(|| StoreError::AlreadyExists);
        let mut guard = OutputArtifactGuard::new(&[1, 2]);

        let status = guard.check_and_register(1, &store).await.unwrap();

        assert_eq!(status, ArtifactStatus::AlreadyUsed);
        assert!(!guard.exhausted());
    }

    #[tokio::test]
    async fn other_store_failures_are_fatal() {
        let store = FailingStore(|| StoreError::internal("connection reset"));
        let mut guard = OutputArtifactGuard::new(&[1, 2]);

        let err = guard.check_and_register(1, &store).await.unwrap_err();

        assert!(matches!(err, WorkloadError::Store(StoreError::Internal { .. })));
    }

    #[tokio::test]
    async fn exhaustion_counts_both_sources() {
        let store = InMemoryStore::with_population(2, 1);
        store.seed_event(make_event(EventType::Output, 1));
        let mut guard = OutputArtifactGuard::new(&[1, 2]);
        assert!(!guard.exhausted());

        guard.check_and_register(1, &store).await.unwrap();
        assert!(!guard.exhausted());

        guard.check_and_register(2, &store).await.unwrap();
        assert!(guard.exhausted());
    }
}
