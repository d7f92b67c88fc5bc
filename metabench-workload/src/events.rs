//! Batch construction with rejection sampling and byte accounting.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use rand_distr::weighted::WeightedIndex;

use metabench_store::MetadataStore;
use metabench_types::{Event, EventPath, EventType, Node, PathStep};

use crate::config::{FillEventsConfig, Specification};
use crate::dist::dirichlet_categorical;
use crate::error::{WorkloadError, WorkloadResult};
use crate::guard::{ArtifactStatus, OutputArtifactGuard};

/// The step key attached to every generated event path.
const STEP_KEY: &str = "foo";

/// One pre-built batch of events plus its transferred-byte estimate.
///
/// Built during set-up, submitted verbatim by one `run_op` invocation, and
/// dropped at tear-down. Immutable in between.
#[derive(Clone, Debug)]
pub struct WorkItem {
    /// The events destined for a single store write.
    pub events: Vec<Event>,
    /// Precomputed byte volume of this batch, for throughput reporting.
    pub transferred_bytes: u64,
}

/// Draws artifact/execution pairs and assembles them into event batches.
///
/// Owns the popularity samplers, the random stream, and the duplicate-output
/// guard for one set-up pass. All draws of one workload instance come from
/// the single [`SmallRng`] seeded at construction.
#[derive(Debug)]
pub(crate) struct EventGenerator {
    specification: Specification,
    artifact_ids: Vec<i64>,
    execution_ids: Vec<i64>,
    artifact_dist: WeightedIndex<f64>,
    execution_dist: WeightedIndex<f64>,
    guard: OutputArtifactGuard,
    rng: SmallRng,
}

fn artifact_ids(nodes: &[Node]) -> WorkloadResult<Vec<i64>> {
    nodes
        .iter()
        .map(|node| {
            node.as_artifact().map(|artifact| artifact.id).ok_or_else(|| {
                WorkloadError::InvalidPopulation(
                    "artifact list contains an execution node".into(),
                )
            })
        })
        .collect()
}

fn execution_ids(nodes: &[Node]) -> WorkloadResult<Vec<i64>> {
    nodes
        .iter()
        .map(|node| {
            node.as_execution().map(|execution| execution.id).ok_or_else(|| {
                WorkloadError::InvalidPopulation(
                    "execution list contains an artifact node".into(),
                )
            })
        })
        .collect()
}

impl EventGenerator {
    /// Builds both popularity samplers over the given population.
    ///
    /// The node lists must be non-empty and variant-homogeneous; anything
    /// else is a fatal population error.
    pub fn new(
        config: &FillEventsConfig,
        artifacts: &[Node],
        executions: &[Node],
        seed: u64,
    ) -> WorkloadResult<Self> {
        let artifact_ids = artifact_ids(artifacts)?;
        let execution_ids = execution_ids(executions)?;

        let mut rng = SmallRng::seed_from_u64(seed);
        let artifact_dist = dirichlet_categorical(
            artifact_ids.len(),
            config.artifact_node_popularity_categorical.dirichlet_alpha,
            &mut rng,
        )?;
        let execution_dist = dirichlet_categorical(
            execution_ids.len(),
            config.execution_node_popularity.dirichlet_alpha,
            &mut rng,
        )?;
        let guard = OutputArtifactGuard::new(&artifact_ids);

        Ok(Self {
            specification: config.specification,
            artifact_ids,
            execution_ids,
            artifact_dist,
            execution_dist,
            guard,
            rng,
        })
    }

    /// Draws a per-batch event count uniformly from the inclusive range.
    pub fn draw_event_count(&mut self, minimum: u64, maximum: u64) -> u64 {
        self.rng.random_range(minimum..=maximum)
    }

    /// Builds one batch of `target_count` events.
    ///
    /// In output mode, draws whose artifact already carries an output event
    /// are discarded and redrawn without counting toward `target_count`
    /// (rejection sampling). Once every distinct artifact is known used
    /// while events are still needed, this fails with
    /// [`WorkloadError::ArtifactPoolExhausted`] instead of looping forever.
    pub async fn build_batch(
        &mut self,
        store: &dyn MetadataStore,
        target_count: u64,
    ) -> WorkloadResult<WorkItem> {
        let mut events = Vec::with_capacity(target_count as usize);
        let mut transferred_bytes = 0;

        while (events.len() as u64) < target_count {
            if self.specification == Specification::Output && self.guard.exhausted() {
                return Err(WorkloadError::ArtifactPoolExhausted {
                    population: self.guard.population(),
                });
            }

            let artifact_id = self.artifact_ids[self.artifact_dist.sample(&mut self.rng)];
            let execution_id = self.execution_ids[self.execution_dist.sample(&mut self.rng)];

            if self.specification == Specification::Output {
                let status = self.guard.check_and_register(artifact_id, store).await?;
                if status == ArtifactStatus::AlreadyUsed {
                    // Rejection sampling: the draw does not count.
                    continue;
                }
            }

            let event = Event {
                event_type: match self.specification {
                    Specification::Input => EventType::Input,
                    Specification::Output => EventType::Output,
                },
                artifact_id,
                execution_id,
                path: EventPath {
                    steps: vec![PathStep::new(STEP_KEY)],
                },
            };
            transferred_bytes += event.transferred_bytes();
            events.push(event);
        }

        Ok(WorkItem {
            events,
            transferred_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use metabench_store::InMemoryStore;
    use metabench_types::{Artifact, Execution};

    use crate::config::{CategoricalDistribution, EventCount};

    use super::*;

    fn make_config(specification: Specification) -> FillEventsConfig {
        FillEventsConfig {
            specification,
            num_operations: 1,
            num_events: EventCount {
                minimum: 1,
                maximum: 1,
            },
            artifact_node_popularity_categorical: CategoricalDistribution {
                dirichlet_alpha: 1.0,
            },
            execution_node_popularity: CategoricalDistribution {
                dirichlet_alpha: 1.0,
            },
            seed: Some(7),
        }
    }

    fn make_population(num_artifacts: i64, num_executions: i64) -> (Vec<Node>, Vec<Node>) {
        let artifacts = (1..=num_artifacts)
            .map(|id| Node::Artifact(Artifact { id }))
            .collect();
        let executions = (1..=num_executions)
            .map(|id| Node::Execution(Execution { id }))
            .collect();
        (artifacts, executions)
    }

    #[tokio::test]
    async fn output_batches_never_repeat_an_artifact() {
        let store = InMemoryStore::with_population(3, 2);
        let (artifacts, executions) = make_population(3, 2);
        let config = make_config(Specification::Output);
        let mut generator = EventGenerator::new(&config, &artifacts, &executions, 7).unwrap();

        let item = generator.build_batch(&store, 2).await.unwrap();

        let targets: HashSet<_> = item.events.iter().map(|event| event.artifact_id).collect();
        assert_eq!(item.events.len(), 2);
        assert_eq!(targets.len(), 2, "an artifact was outputted twice");
        // 2 events, each 17 bytes of overhead plus the 3-byte "foo" step.
        assert_eq!(item.transferred_bytes, 40);
    }

    #[tokio::test]
    async fn input_batches_may_repeat_artifacts_freely() {
        let store = InMemoryStore::with_population(1, 1);
        let (artifacts, executions) = make_population(1, 1);
        let config = make_config(Specification::Input);
        let mut generator = EventGenerator::new(&config, &artifacts, &executions, 7).unwrap();

        let item = generator.build_batch(&store, 5).await.unwrap();

        assert_eq!(item.events.len(), 5);
        assert!(item.events.iter().all(|event| event.artifact_id == 1));
    }

    #[tokio::test]
    async fn exhausted_artifact_pool_fails_fast() {
        let store = InMemoryStore::with_population(1, 1);
        let (artifacts, executions) = make_population(1, 1);
        let config = make_config(Specification::Output);
        let mut generator = EventGenerator::new(&config, &artifacts, &executions, 7).unwrap();

        let err = generator.build_batch(&store, 2).await.unwrap_err();

        assert!(matches!(
            err,
            WorkloadError::ArtifactPoolExhausted { population: 1 }
        ));
    }

    #[tokio::test]
    async fn persisted_output_events_shrink_the_pool() {
        let store = InMemoryStore::with_population(3, 1);
        let (artifacts, executions) = make_population(3, 1);
        store.seed_event(Event {
            event_type: EventType::Output,
            artifact_id: 2,
            execution_id: 1,
            path: EventPath::default(),
        });
        let config = make_config(Specification::Output);
        let mut generator = EventGenerator::new(&config, &artifacts, &executions, 7).unwrap();

        let item = generator.build_batch(&store, 2).await.unwrap();

        assert!(
            item.events.iter().all(|event| event.artifact_id != 2),
            "artifact 2 already has a persisted output event"
        );
    }

    #[tokio::test]
    async fn mixed_node_lists_are_rejected() {
        let config = make_config(Specification::Input);
        let (artifacts, _) = make_population(2, 0);
        let mixed = vec![
            Node::Execution(Execution { id: 1 }),
            Node::Artifact(Artifact { id: 2 }),
        ];

        let err = EventGenerator::new(&config, &artifacts, &mixed, 7).unwrap_err();
        assert!(matches!(err, WorkloadError::InvalidPopulation(_)));

        let err = EventGenerator::new(&config, &mixed, &artifacts, 7).unwrap_err();
        assert!(matches!(err, WorkloadError::InvalidPopulation(_)));
    }

    #[test]
    fn event_counts_respect_the_inclusive_range() {
        let (artifacts, executions) = make_population(2, 2);
        let config = make_config(Specification::Input);
        let mut generator = EventGenerator::new(&config, &artifacts, &executions, 7).unwrap();

        for _ in 0..1000 {
            let count = generator.draw_event_count(1, 5);
            assert!((1..=5).contains(&count));
        }
    }
}
