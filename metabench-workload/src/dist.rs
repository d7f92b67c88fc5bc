//! Dirichlet-prior categorical sampling over node indices.
//!
//! A popularity distribution is a categorical sampler over `[0, population)`
//! whose probability vector is a single draw from a symmetric
//! Dirichlet(alpha, ..., alpha) prior. Drawing `population` independent
//! Gamma(alpha, 1) variates and using them as unnormalized weights of a
//! [`WeightedIndex`] reproduces such a draw without ever materializing
//! normalized probabilities. The weight vector is fixed afterwards, so one
//! workload instance samples against a stable "hot/cold" access pattern.

use rand::rngs::SmallRng;
use rand_distr::weighted::WeightedIndex;
use rand_distr::{Distribution, Gamma};

use crate::error::{WorkloadError, WorkloadResult};

/// Builds a categorical sampler over `[0, population)` with Dirichlet skew.
pub(crate) fn dirichlet_categorical(
    population: usize,
    alpha: f64,
    rng: &mut SmallRng,
) -> WorkloadResult<WeightedIndex<f64>> {
    if population == 0 {
        return Err(WorkloadError::InvalidPopulation(
            "cannot build a popularity distribution over an empty node population".into(),
        ));
    }

    let gamma = Gamma::new(alpha, 1.0).map_err(|err| {
        WorkloadError::InvalidConfig(format!("dirichlet_alpha {alpha} is unusable: {err}"))
    })?;
    let weights: Vec<f64> = (0..population).map(|_| gamma.sample(rng)).collect();

    // A Gamma sample can underflow to zero for extreme alpha values, and
    // `WeightedIndex` rejects an all-zero weight vector.
    WeightedIndex::new(weights).map_err(|err| {
        WorkloadError::InvalidConfig(format!(
            "dirichlet_alpha {alpha} produced degenerate popularity weights: {err}"
        ))
    })
}
