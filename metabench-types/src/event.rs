//! Events and their transferred-byte accounting.
//!
//! An [`Event`] is a typed link between one artifact and one execution, with
//! an ordered path of named steps. Workloads construct events in batches and
//! never mutate them afterwards.
//!
//! # Byte accounting
//!
//! The benchmark driver reports throughput in bytes, so every event knows its
//! wire cost: two 8-byte id fields plus a 1-byte type tag of fixed overhead,
//! plus the byte length of every path step key.

use serde::{Deserialize, Serialize};

/// Fixed wire overhead of a single event: two `i64` ids and the type tag.
pub const EVENT_FIXED_BYTES: u64 = 8 * 2 + 1;

/// Whether an event feeds an artifact into an execution, or records one
/// coming out of it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// The artifact was consumed by the execution.
    Input,
    /// The artifact was produced by the execution. At most one output event
    /// may ever target a given artifact.
    Output,
}

/// One named step of an event path.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    /// The step key.
    pub key: String,
}

impl PathStep {
    /// Creates a step with the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// The ordered steps locating an event within an execution's context.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct EventPath {
    /// The steps, in order.
    pub steps: Vec<PathStep>,
}

/// A typed link between one artifact and one execution.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Whether this is an input or an output event.
    pub event_type: EventType,
    /// The artifact this event relates.
    pub artifact_id: i64,
    /// The execution this event relates.
    pub execution_id: i64,
    /// The step path attached to this event.
    pub path: EventPath,
}

impl Event {
    /// The number of bytes transferring this event to the store costs.
    pub fn transferred_bytes(&self) -> u64 {
        let step_bytes: u64 = self.path.steps.iter().map(|step| step.key.len() as u64).sum();
        EVENT_FIXED_BYTES + step_bytes
    }
}
