use thiserror::Error;

use crate::{dot::DotError, graph::NodeId};

/// Errors surfaced before an exploration starts any task. Once tasks are running, an exploration
/// always terminates normally.
#[derive(Debug, Error)]
pub enum ExploreError {
    #[error("Missing a starting node for the search")]
    EmptyStartSet,

    #[error("Invalid starting node: {name}")]
    UnknownStart { name: String },

    #[error("Starting node id {node} is out of range for a graph with {num_nodes} nodes")]
    StartOutOfRange { node: NodeId, num_nodes: usize },

    #[error("The number of parallel workers ({n_workers}) cannot be lower than 1")]
    InvalidWorkerCount { n_workers: usize },

    #[error("Failed to start parallel worker {id}")]
    WorkerSpawn {
        id: usize,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    GraphParse(#[from] DotError),
}
