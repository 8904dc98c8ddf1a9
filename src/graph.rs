//! Defines the read-only `Graph` view that every exploration strategy traverses.

use crate::FastMap;

/// Dense handle of a node, assigned in order of first mention.
pub type NodeId = usize;

/// Accumulates nodes and edges before freezing them into a [`Graph`].
#[derive(Debug)]
pub struct GraphBuilder {
    directed: bool,
    name: Option<String>,
    names: Vec<String>,
    index: FastMap<String, NodeId>,
    edges: Vec<(NodeId, NodeId)>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            name: None,
            names: Vec::new(),
            index: FastMap::default(),
            edges: Vec::new(),
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_owned());
    }

    /// Returns the id of the node called `name`, creating it if needed.
    pub fn add_node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }

        let id = self.names.len();
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), id);
        id
    }

    /// Adds an edge between two node ids returned by [`GraphBuilder::add_node`].
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        debug_assert!(from < self.names.len() && to < self.names.len());
        self.edges.push((from, to));
    }

    /// Adds an edge between two named nodes, creating them if needed.
    pub fn add_named_edge(&mut self, from: &str, to: &str) {
        let from = self.add_node(from);
        let to = self.add_node(to);
        self.add_edge(from, to);
    }

    #[must_use]
    pub fn build(self) -> Graph {
        let num_nodes = self.names.len();
        let mut successors = vec![Vec::new(); num_nodes];
        let mut predecessors = vec![Vec::new(); num_nodes];

        for &(from, to) in &self.edges {
            successors[from].push(to);
            predecessors[to].push(from);
        }

        for list in successors.iter_mut().chain(predecessors.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        let neighbours = if self.directed {
            successors.clone()
        } else {
            successors
                .iter()
                .zip(&predecessors)
                .map(|(out, inc)| {
                    let mut both = out.iter().chain(inc).copied().collect::<Vec<_>>();
                    both.sort_unstable();
                    both.dedup();
                    both
                })
                .collect()
        };

        Graph {
            directed: self.directed,
            name: self.name,
            names: self.names,
            index: self.index,
            num_edges: self.edges.len(),
            successors,
            predecessors,
            neighbours,
        }
    }
}

/// An immutable graph. Shared between threads without synchronisation.
#[derive(Debug)]
pub struct Graph {
    directed: bool,
    name: Option<String>,
    names: Vec<String>,
    index: FastMap<String, NodeId>,
    num_edges: usize,
    successors: Vec<Vec<NodeId>>,
    predecessors: Vec<Vec<NodeId>>,
    neighbours: Vec<Vec<NodeId>>,
}

impl Graph {
    /// Builds a graph from a list of named edges. Convenient for small, hand-written graphs.
    #[must_use]
    pub fn from_edges(directed: bool, edges: &[(&str, &str)]) -> Self {
        let mut builder = GraphBuilder::new(directed);
        for &(from, to) in edges {
            builder.add_named_edge(from, to);
        }
        builder.build()
    }

    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.names.len()
    }

    /// Number of declared edges, counting multi-edges.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Like [`Graph::lookup`], but also accepts a name wrapped in double quotes.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<NodeId> {
        self.lookup(name).or_else(|| {
            name.strip_prefix('"')
                .and_then(|name| name.strip_suffix('"'))
                .and_then(|name| self.lookup(name))
        })
    }

    /// # Panics
    ///
    /// Panics if `node` is not a node of this graph.
    #[must_use]
    pub fn node_name(&self, node: NodeId) -> &str {
        &self.names[node]
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        node < self.names.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        0..self.names.len()
    }

    #[must_use]
    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        &self.successors[node]
    }

    #[must_use]
    pub fn predecessors(&self, node: NodeId) -> &[NodeId] {
        &self.predecessors[node]
    }

    /// Outgoing nodes for a directed graph, the union of outgoing and incoming nodes otherwise.
    /// Multi-edges are collapsed. Callers must not rely on the order.
    #[must_use]
    pub fn neighbours(&self, node: NodeId) -> &[NodeId] {
        &self.neighbours[node]
    }

    /// Iterates over every distinct `(from, to)` pair.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.successors
            .iter()
            .enumerate()
            .flat_map(|(from, out)| out.iter().map(move |&to| (from, to)))
    }
}
