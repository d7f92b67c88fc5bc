//! Workload generators for benchmarking a metadata store.
//!
//! The [`FillEvents`] workload synthesizes batches of event-creation requests
//! against a pre-populated artifact/execution population and submits them to
//! a [`MetadataStore`](metabench_store::MetadataStore).
//!
//! Node popularity follows a categorical distribution whose probability
//! vector is drawn once per workload instance from a symmetric *Dirichlet*
//! prior. This gives every run a fixed non-uniform access pattern: a few
//! "hot" nodes receive most events, with a long tail of "cold" ones.
//!
//! For *output* events the workload additionally enforces that no artifact is
//! ever the target of more than one output event, counting both events
//! persisted in the store and events generated earlier in the same run.
//! Violating draws are discarded and redrawn (rejection sampling).
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod workload;

mod dist;
mod events;
mod guard;

pub use crate::config::FillEventsConfig;
pub use crate::error::WorkloadError;
pub use crate::events::WorkItem;
pub use crate::workload::{FillEvents, Workload};
