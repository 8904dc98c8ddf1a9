//! Defines the `ExplorationStrategy` trait and the helpers that run a strategy to completion.

use std::time::{Duration, Instant};

use itertools::Itertools;

use crate::{
    error::ExploreError,
    graph::{Graph, NodeId},
    sink::{NodeData, Sink},
};

/// A way of computing the distance of every node reachable from a starting frontier.
pub trait ExplorationStrategy: Sync {
    /// Human-readable name, used in reports.
    fn name(&self) -> &str;

    /// Sends one [`NodeData`] per reachable node on `sink`, then finishes it.
    ///
    /// Validation errors are returned before anything is sent, in which case the sink is dropped
    /// without being finished.
    fn explore(&self, graph: &Graph, starts: &[NodeId], sink: Sink) -> Result<(), ExploreError>;
}

/// Checks the starting frontier and removes duplicates, keeping the first occurrence of each node.
pub(crate) fn validate_starts(
    graph: &Graph,
    starts: &[NodeId],
) -> Result<Vec<NodeId>, ExploreError> {
    if starts.is_empty() {
        return Err(ExploreError::EmptyStartSet);
    }

    if let Some(&node) = starts.iter().find(|&&node| !graph.contains(node)) {
        return Err(ExploreError::StartOutOfRange {
            node,
            num_nodes: graph.num_nodes(),
        });
    }

    Ok(starts.iter().copied().unique().collect())
}

/// The outcome of running one strategy.
#[derive(Debug, Clone)]
pub struct Exploration {
    pub strategy: String,
    /// Sorted by ascending distance, then ascending name.
    pub nodes: Vec<NodeData>,
    pub elapsed: Duration,
}

impl Exploration {
    #[must_use]
    pub fn explored(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn elapsed_micros(&self) -> u128 {
        self.elapsed.as_micros()
    }

    /// Whether both explorations found the same nodes at the same distances.
    #[must_use]
    pub fn agrees_with(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }

    #[must_use]
    pub fn distance_of(&self, name: &str) -> Option<usize> {
        self.nodes
            .iter()
            .find(|node| node.name == name)
            .map(|node| node.dist)
    }
}

/// Lists nodes by their distance from the starting frontier, breaking ties by name.
#[must_use]
pub fn list_by_distance(nodes: Vec<NodeData>) -> Vec<NodeData> {
    nodes
        .into_iter()
        .sorted_by(|a, b| a.dist.cmp(&b.dist).then_with(|| a.name.cmp(&b.name)))
        .collect()
}

/// Runs `strategy` on its own thread while this thread gathers the results, and times the whole
/// exploration.
pub fn explore_graph(
    graph: &Graph,
    strategy: &dyn ExplorationStrategy,
    starts: &[NodeId],
) -> Result<Exploration, ExploreError> {
    let (sink, receiver) = Sink::channel();

    tracing::info!("starting {} exploration", strategy.name());
    let start = Instant::now();

    let (outcome, nodes) = std::thread::scope(|s| {
        let explorer = s.spawn(move || strategy.explore(graph, starts, sink));
        let nodes = receiver.gather();
        let outcome = explorer
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (outcome, nodes)
    });

    let elapsed = start.elapsed();
    outcome?;

    tracing::info!(
        "{} exploration found {} nodes in {}us",
        strategy.name(),
        nodes.len(),
        elapsed.as_micros(),
    );

    Ok(Exploration {
        strategy: strategy.name().to_owned(),
        nodes: list_by_distance(nodes),
        elapsed,
    })
}
