use crossbeam_channel::Receiver;

use crate::{
    graph::{Graph, NodeId},
    parallel::{barrier::LevelBarrier, distances::DistanceClient, frontier::FrontierHandle},
    sink::{NodeData, Sink},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WorkerStats {
    pub(crate) expanded: u64,
    pub(crate) staged: u64,
}

/// Expands nodes handed out by the coordinator until the jobs channel closes.
pub(crate) struct Worker<'a> {
    pub(crate) id: usize,
    pub(crate) graph: &'a Graph,
    pub(crate) jobs: Receiver<NodeId>,
    pub(crate) frontier: FrontierHandle,
    pub(crate) distances: DistanceClient,
    pub(crate) sink: &'a Sink,
    pub(crate) barrier: &'a LevelBarrier,
}

impl Worker<'_> {
    pub(crate) fn run(mut self) -> WorkerStats {
        let mut stats = WorkerStats::default();

        tracing::debug!("[Worker {}] waiting for work", self.id);

        while let Ok(node) = self.jobs.recv() {
            stats.staged += self.expand(node);
            stats.expanded += 1;
        }

        tracing::debug!(
            "[Worker {}] jobs closed, expanded {} nodes",
            self.id,
            stats.expanded,
        );

        stats
    }

    /// Returns the number of neighbours staged for the next level.
    fn expand(&mut self, node: NodeId) -> u64 {
        // Releases the level even if this expansion panics, so the coordinator can reach the join
        let _arrival = self.barrier.arrival();

        // Always finite and equal to the current level
        let dist = self.distances.query(node);
        let new_dist = dist + 1;

        tracing::trace!("[Worker {}] expanding node {node} at distance {dist}", self.id);

        // Not atomic across neighbours: a racing worker may lower a distance between our query
        // and our update, in which case the distance actor refuses ours
        let mut batch = Vec::new();
        for &neighbour in self.graph.neighbours(node) {
            if new_dist < self.distances.query(neighbour) {
                self.distances.update(neighbour, new_dist);
                batch.push(neighbour);
            }
        }

        let staged = batch.len() as u64;
        if !batch.is_empty() {
            self.frontier.append(batch);
        }

        self.sink.emit(NodeData::new(self.graph.node_name(node), dist));

        staged
    }
}
