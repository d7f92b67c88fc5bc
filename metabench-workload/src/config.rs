//! Configuration for the fill-events workload.

use serde::Deserialize;

/// Which event type a workload instance generates.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specification {
    /// Generate input events; the same artifact may be drawn any number of
    /// times.
    Input,
    /// Generate output events; each artifact may be targeted at most once,
    /// across this run and all previously persisted events.
    Output,
}

/// Inclusive range for the per-batch event count.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct EventCount {
    /// Smallest number of events per batch.
    pub minimum: u64,
    /// Largest number of events per batch.
    pub maximum: u64,
}

/// A categorical distribution with a symmetric Dirichlet prior.
///
/// Smaller `dirichlet_alpha` values concentrate probability mass on fewer
/// nodes (more skew); large values approach a uniform distribution.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CategoricalDistribution {
    /// The Dirichlet concentration parameter. Must be positive.
    pub dirichlet_alpha: f64,
}

/// Configuration of one [`FillEvents`](crate::FillEvents) workload instance.
#[derive(Clone, Debug, Deserialize)]
pub struct FillEventsConfig {
    /// The event type to generate.
    pub specification: Specification,
    /// How many work items (batches) to pre-generate during set-up.
    pub num_operations: u64,
    /// Per-batch event count range.
    pub num_events: EventCount,
    /// Popularity skew over the existing artifact nodes.
    pub artifact_node_popularity_categorical: CategoricalDistribution,
    /// Popularity skew over the existing execution nodes.
    pub execution_node_popularity: CategoricalDistribution,
    /// Seed for the random stream driving all draws of one set-up.
    ///
    /// `None` draws a fresh seed, `Some` makes runs reproducible.
    #[serde(default)]
    pub seed: Option<u64>,
}
