//! Random graphs, for stress-testing the strategies against each other.

use rand::{seq::SliceRandom, Rng};

use crate::graph::{Graph, GraphBuilder, NodeId};

/// Creates a graph with nodes `n0..n{num_nodes - 1}` and `num_edges` edges between uniformly random
/// endpoints. Self-loops and multi-edges are allowed.
///
/// # Panics
///
/// Panics if `num_edges > 0` and `num_nodes == 0`.
pub fn random_graph<R: Rng + ?Sized>(
    rng: &mut R,
    num_nodes: usize,
    num_edges: usize,
    directed: bool,
) -> Graph {
    assert!(num_nodes > 0 || num_edges == 0, "edges need nodes");

    let mut builder = GraphBuilder::new(directed);
    for i in 0..num_nodes {
        builder.add_node(&format!("n{i}"));
    }

    for _ in 0..num_edges {
        let from = rng.gen_range(0..num_nodes);
        let to = rng.gen_range(0..num_nodes);
        builder.add_edge(from, to);
    }

    builder.build()
}

/// Picks `count` distinct starting nodes, or every node if the graph is smaller.
pub fn random_starts<R: Rng + ?Sized>(rng: &mut R, graph: &Graph, count: usize) -> Vec<NodeId> {
    let nodes = graph.nodes().collect::<Vec<_>>();
    nodes.choose_multiple(rng, count).copied().collect()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn sizes_match() {
        let mut rng = StdRng::seed_from_u64(7);
        let graph = random_graph(&mut rng, 100, 1000, true);

        assert_eq!(graph.num_nodes(), 100);
        assert_eq!(graph.num_edges(), 1000);
        assert!(graph.has("n99"));
    }

    #[test]
    fn starts_are_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let graph = random_graph(&mut rng, 10, 0, false);

        let mut starts = random_starts(&mut rng, &graph, 5);
        starts.sort_unstable();
        starts.dedup();
        assert_eq!(starts.len(), 5);

        assert_eq!(random_starts(&mut rng, &graph, 50).len(), 10);
    }
}
