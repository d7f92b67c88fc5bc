//! The fill-events workload and the driver-facing lifecycle contract.
//!
//! A workload moves through three phases: `set_up` pre-generates an ordered
//! list of immutable [`WorkItem`]s, `run_op` submits one of them per
//! invocation, and `tear_down` releases everything retained since set-up.
//! `set_up` and `tear_down` each run exactly once per instance; `run_op` may
//! be invoked any number of times with distinct indices, including
//! concurrently, since it never mutates workload-owned state.

use metabench_store::MetadataStore;

use crate::config::{EventCount, FillEventsConfig, Specification};
use crate::error::{WorkloadError, WorkloadResult};
use crate::events::{EventGenerator, WorkItem};

/// The lifecycle contract the benchmark driver runs workloads through.
#[async_trait::async_trait]
pub trait Workload: Send {
    /// Pre-generates all work items against the store's existing population.
    ///
    /// Runs exactly once per instance. On failure no partial state is
    /// retained.
    async fn set_up(&mut self, store: &dyn MetadataStore) -> WorkloadResult<()>;

    /// Submits the pre-built work item at `index` as a single store write.
    ///
    /// Returns the store's outcome unchanged. Safe to invoke concurrently
    /// for distinct indices.
    async fn run_op(&self, index: usize, store: &dyn MetadataStore) -> WorkloadResult<()>;

    /// Releases all state retained since set-up. Runs exactly once.
    fn tear_down(&mut self) -> WorkloadResult<()>;

    /// A stable label identifying this workload in reports.
    fn name(&self) -> &str;

    /// The byte volume of work item `index`, for throughput reporting.
    fn transferred_bytes(&self, index: usize) -> Option<u64>;
}

#[derive(Debug)]
enum Lifecycle {
    Idle,
    Ready(Vec<WorkItem>),
    TornDown,
}

/// A workload that fills the metadata store with input or output events.
#[derive(Debug)]
pub struct FillEvents {
    config: FillEventsConfig,
    name: &'static str,
    state: Lifecycle,
}

impl FillEvents {
    /// Creates an idle workload instance from its configuration.
    pub fn new(config: FillEventsConfig) -> Self {
        let name = match config.specification {
            Specification::Input => "FILL_EVENTS_INPUT",
            Specification::Output => "FILL_EVENTS_OUTPUT",
        };
        Self {
            config,
            name,
            state: Lifecycle::Idle,
        }
    }

    /// The pre-built work items, once set-up has completed.
    pub fn work_items(&self) -> Option<&[WorkItem]> {
        match &self.state {
            Lifecycle::Ready(work_items) => Some(work_items),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl Workload for FillEvents {
    async fn set_up(&mut self, store: &dyn MetadataStore) -> WorkloadResult<()> {
        if !matches!(self.state, Lifecycle::Idle) {
            return Err(WorkloadError::InvalidState(
                "set_up may only run once per workload instance".into(),
            ));
        }
        let EventCount { minimum, maximum } = self.config.num_events;
        if minimum > maximum {
            return Err(WorkloadError::InvalidConfig(format!(
                "num_events minimum {minimum} exceeds maximum {maximum}"
            )));
        }

        tracing::info!(
            workload = self.name,
            num_operations = self.config.num_operations,
            "setting up"
        );

        let (artifacts, executions) = store.existing_nodes().await?;
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut generator = EventGenerator::new(&self.config, &artifacts, &executions, seed)?;

        // Built into a local list so a failure part-way discards everything.
        let mut work_items = Vec::with_capacity(self.config.num_operations as usize);
        for _ in 0..self.config.num_operations {
            let num_events = generator.draw_event_count(minimum, maximum);
            let work_item = generator.build_batch(store, num_events).await?;
            tracing::debug!(
                events = work_item.events.len(),
                transferred_bytes = work_item.transferred_bytes,
                "built batch"
            );
            work_items.push(work_item);
        }

        tracing::info!(workload = self.name, work_items = work_items.len(), "set up");
        self.state = Lifecycle::Ready(work_items);
        Ok(())
    }

    async fn run_op(&self, index: usize, store: &dyn MetadataStore) -> WorkloadResult<()> {
        let Lifecycle::Ready(work_items) = &self.state else {
            return Err(WorkloadError::InvalidState(
                "run_op requires a completed set_up".into(),
            ));
        };
        let work_item = work_items.get(index).ok_or_else(|| {
            WorkloadError::InvalidState(format!("no work item at index {index}"))
        })?;

        store.put_events(&work_item.events).await?;
        Ok(())
    }

    fn tear_down(&mut self) -> WorkloadResult<()> {
        match self.state {
            Lifecycle::Ready(_) => {
                self.state = Lifecycle::TornDown;
                Ok(())
            }
            Lifecycle::Idle => Err(WorkloadError::InvalidState(
                "tear_down requires a completed set_up".into(),
            )),
            Lifecycle::TornDown => Err(WorkloadError::InvalidState(
                "tear_down may only run once per workload instance".into(),
            )),
        }
    }

    fn name(&self) -> &str {
        self.name
    }

    fn transferred_bytes(&self, index: usize) -> Option<u64> {
        self.work_items()?
            .get(index)
            .map(|work_item| work_item.transferred_bytes)
    }
}
