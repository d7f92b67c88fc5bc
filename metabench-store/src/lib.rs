//! The metadata-store boundary consumed by metabench workloads.
//!
//! Workloads never talk to a concrete store implementation; they go through
//! the [`MetadataStore`] trait, which exposes exactly the three operations
//! the benchmark needs: fetching the pre-populated node lists, querying the
//! events recorded against an artifact, and submitting a batch of events.
//!
//! [`InMemoryStore`] is a mutex-guarded reference implementation backed by
//! plain collections, removing the need for a running store in unit tests.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod memory;

pub use memory::InMemoryStore;

use std::fmt::Debug;

use metabench_types::{Event, Node};
use thiserror::Error;

/// Errors surfaced by a metadata store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The queried record does not exist.
    ///
    /// For event queries this means "no events recorded", which callers
    /// treat as an empty result rather than a failure.
    #[error("record not found")]
    NotFound,

    /// The store rejected a write because the record already exists.
    #[error("record already exists")]
    AlreadyExists,

    /// Any other store failure. These are always fatal for the caller.
    #[error("store error: {context}")]
    Internal {
        /// Short description of the failed operation.
        context: String,
        /// The underlying cause, if any.
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Creates an [`StoreError::Internal`] without an underlying cause.
    pub fn internal(context: impl Into<String>) -> Self {
        StoreError::Internal {
            context: context.into(),
            cause: None,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A type-erased [`MetadataStore`] handle.
pub type BoxedStore = Box<dyn MetadataStore>;

/// The operations metabench workloads consume from a metadata store.
#[async_trait::async_trait]
pub trait MetadataStore: Debug + Send + Sync + 'static {
    /// Fetches the existing node population as `(artifacts, executions)`.
    async fn existing_nodes(&self) -> StoreResult<(Vec<Node>, Vec<Node>)>;

    /// Returns all events recorded against the given artifact.
    ///
    /// [`StoreError::NotFound`] means the artifact has no recorded events.
    async fn events_by_artifact(&self, artifact_id: i64) -> StoreResult<Vec<Event>>;

    /// Persists a batch of events as a single write request.
    async fn put_events(&self, events: &[Event]) -> StoreResult<()>;
}
