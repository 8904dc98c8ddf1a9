//! Single-threaded BFS, used as the reference answer for the parallel engine.

use std::collections::VecDeque;

use crate::{
    error::ExploreError,
    graph::{Graph, NodeId},
    sink::{NodeData, Sink},
    strategy::{validate_starts, ExplorationStrategy},
    FastMap,
};

/// Textbook BFS with one queue and one distance map. Emits nodes in exact BFS order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialBfs;

impl ExplorationStrategy for SequentialBfs {
    fn name(&self) -> &str {
        "Sequential"
    }

    fn explore(&self, graph: &Graph, starts: &[NodeId], sink: Sink) -> Result<(), ExploreError> {
        let starts = validate_starts(graph, starts)?;

        let mut distances = FastMap::default();
        let mut queue = VecDeque::with_capacity(starts.len());

        for &node in &starts {
            distances.insert(node, 0);
            queue.push_back(node);
        }

        let mut depth = 0;
        let mut new = 0u64;

        while let Some(node) = queue.pop_front() {
            let dist = distances[&node];

            if dist != depth {
                tracing::debug!("depth {depth} new {new}");
                depth = dist;
                new = 0;
            }
            new += 1;

            // The first discovery of a node is final, later ones are ignored
            for &neighbour in graph.neighbours(node) {
                if !distances.contains_key(&neighbour) {
                    distances.insert(neighbour, dist + 1);
                    queue.push_back(neighbour);
                }
            }

            sink.emit(NodeData::new(graph.node_name(node), dist));
        }

        tracing::debug!("depth {depth} new {new}");
        tracing::debug!("no new nodes, done");

        sink.finish();

        Ok(())
    }
}
