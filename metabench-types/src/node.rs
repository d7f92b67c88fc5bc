//! The two node kinds an [`Event`](crate::Event) can relate.
//!
//! The metadata store owns the node population; workloads only ever hold
//! copies of the integer identifiers. A node is an explicit sum type so that
//! callers resolve the variant by pattern matching instead of downcasting.

use serde::{Deserialize, Serialize};

/// A produced or consumed data artifact in the metadata store.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Store-assigned unique identifier.
    pub id: i64,
}

/// A recorded pipeline execution in the metadata store.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    /// Store-assigned unique identifier.
    pub id: i64,
}

/// A node of the metadata store's existing population.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    /// An artifact node.
    Artifact(Artifact),
    /// An execution node.
    Execution(Execution),
}

impl Node {
    /// The store-assigned identifier, regardless of variant.
    pub fn id(&self) -> i64 {
        match self {
            Node::Artifact(artifact) => artifact.id,
            Node::Execution(execution) => execution.id,
        }
    }

    /// Returns the artifact id, or `None` for execution nodes.
    pub fn as_artifact(&self) -> Option<&Artifact> {
        match self {
            Node::Artifact(artifact) => Some(artifact),
            Node::Execution(_) => None,
        }
    }

    /// Returns the execution id, or `None` for artifact nodes.
    pub fn as_execution(&self) -> Option<&Execution> {
        match self {
            Node::Artifact(_) => None,
            Node::Execution(execution) => Some(execution),
        }
    }
}

impl From<Artifact> for Node {
    fn from(artifact: Artifact) -> Self {
        Node::Artifact(artifact)
    }
}

impl From<Execution> for Node {
    fn from(execution: Execution) -> Self {
        Node::Execution(execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_access_is_checked() {
        let node = Node::Artifact(Artifact { id: 7 });

        assert_eq!(node.id(), 7);
        assert_eq!(node.as_artifact(), Some(&Artifact { id: 7 }));
        assert_eq!(node.as_execution(), None);
    }
}
