//! Error types for workload execution.

use metabench_store::StoreError;
use thiserror::Error;

/// Errors surfaced by a workload lifecycle phase.
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// The configuration is unusable, e.g. an inverted event-count range or
    /// a non-positive Dirichlet concentration parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The store's node population cannot back this workload: a node list is
    /// empty, or contains a node of the wrong kind.
    #[error("invalid node population: {0}")]
    InvalidPopulation(String),

    /// Every distinct artifact in the population is already the target of an
    /// output event while more output events are still required. Without
    /// this check rejection sampling would loop forever.
    #[error("artifact pool exhausted: all {population} artifacts already have an output event")]
    ArtifactPoolExhausted {
        /// The number of distinct artifact ids in the population.
        population: usize,
    },

    /// A lifecycle method was called in the wrong state, e.g. `run_op`
    /// before `set_up`, or `set_up` twice.
    #[error("invalid lifecycle state: {0}")]
    InvalidState(String),

    /// A store operation failed. Failures other than the not-found case of
    /// event queries are always fatal for the running phase.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for workload operations.
pub type WorkloadResult<T> = Result<T, WorkloadError>;
