use graphxplorer::{
    dot, explore_graph, Graph, GraphBuilder, NodeId, ParallelBfs, SequentialBfs,
};
use proptest::prelude::*;

#[derive(Debug)]
struct Case {
    graph: Graph,
    starts: Vec<NodeId>,
    n_workers: usize,
}

fn case() -> impl Strategy<Value = Case> {
    (1usize..40, any::<bool>()).prop_flat_map(|(num_nodes, directed)| {
        (
            prop::collection::vec((0..num_nodes, 0..num_nodes), 0..120),
            prop::collection::vec(0..num_nodes, 1..4),
            1usize..8,
        )
            .prop_map(move |(edges, starts, n_workers)| {
                let mut builder = GraphBuilder::new(directed);
                for i in 0..num_nodes {
                    builder.add_node(&format!("n{i}"));
                }
                for (from, to) in edges {
                    builder.add_edge(from, to);
                }

                Case {
                    graph: builder.build(),
                    starts,
                    n_workers,
                }
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parallel_matches_sequential(case in case()) {
        let sequential = explore_graph(&case.graph, &SequentialBfs, &case.starts).unwrap();
        let bfs = ParallelBfs::new(case.n_workers).unwrap();
        let parallel = explore_graph(&case.graph, &bfs, &case.starts).unwrap();

        prop_assert!(sequential.agrees_with(&parallel));
        prop_assert_eq!(sequential.nodes, parallel.nodes);
    }

    #[test]
    fn distances_never_increase(case in case()) {
        let bfs = ParallelBfs::new(case.n_workers).unwrap();
        let (sink, receiver) = graphxplorer::Sink::channel();

        let report = std::thread::scope(|s| {
            let search = s.spawn(|| bfs.run(&case.graph, &case.starts, sink).unwrap());
            let _ = receiver.gather();
            search.join().unwrap()
        });

        // Each accepted distance is the first one for its node, and the final one
        let mut seen = std::collections::HashMap::new();
        for &(node, dist) in &report.assignments {
            prop_assert!(seen.insert(node, dist).is_none());
        }
        for &(node, dist) in &report.distances {
            if let Some(&assigned) = seen.get(&node) {
                prop_assert_eq!(assigned, dist);
            } else {
                prop_assert_eq!(dist, 0);
            }
        }
    }

    #[test]
    fn dot_output_reparses_to_the_same_exploration(case in case()) {
        let text = dot::to_dot(&case.graph);
        let reparsed = dot::parse(&text).unwrap();

        let names = case
            .starts
            .iter()
            .map(|&start| case.graph.node_name(start))
            .collect::<Vec<_>>();
        let starts = names
            .iter()
            .map(|name| reparsed.lookup(name).unwrap())
            .collect::<Vec<_>>();

        let before = explore_graph(&case.graph, &SequentialBfs, &case.starts).unwrap();
        let after = explore_graph(&reparsed, &SequentialBfs, &starts).unwrap();
        prop_assert_eq!(before.nodes, after.nodes);
    }
}
