//! Shared data model for the metabench workload generators.
//!
//! This crate defines the records the benchmark exchanges with the metadata
//! store: [`node::Node`]s (the pre-populated Artifact/Execution population)
//! and [`event::Event`]s (the typed links a workload generates between them),
//! along with the transferred-byte accounting the driver uses for throughput
//! reporting.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod event;
pub mod node;

pub use event::{Event, EventPath, EventType, PathStep};
pub use node::{Artifact, Execution, Node};
