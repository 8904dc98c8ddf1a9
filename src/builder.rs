use thiserror::Error;

use crate::{
    error::ExploreError,
    graph::{Graph, NodeId},
    parallel::ParallelBfs,
    sequential::SequentialBfs,
    strategy::{explore_graph, Exploration, ExplorationStrategy},
};

#[derive(Debug, Error)]
pub enum ExplorerBuilderError {
    #[error("`graph` not set")]
    GraphNotSet,

    #[error("`starting_vertices` not set")]
    StartingVerticesNotSet,

    #[error("`n_workers` not set")]
    NWorkersNotSet,

    #[error(transparent)]
    Explore(#[from] ExploreError),
}

#[derive(Debug)]
pub struct ExplorerBuilder<'g> {
    graph: Option<&'g Graph>,
    starting_vertices: Option<Vec<String>>,
    n_workers: Option<usize>,
}

impl Default for ExplorerBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'g> ExplorerBuilder<'g> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: None,
            starting_vertices: None,
            n_workers: None,
        }
    }

    #[must_use]
    pub fn graph(mut self, graph: &'g Graph) -> Self {
        self.graph = Some(graph);
        self
    }

    #[must_use]
    pub fn starting_vertices<S: AsRef<str>>(mut self, starting_vertices: &[S]) -> Self {
        self.starting_vertices = Some(
            starting_vertices
                .iter()
                .map(|name| name.as_ref().to_owned())
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn n_workers(mut self, n_workers: usize) -> Self {
        self.n_workers = Some(n_workers);
        self
    }

    pub fn build_no_defaults(self) -> Result<Explorer<'g>, ExplorerBuilderError> {
        let graph = self.graph.ok_or(ExplorerBuilderError::GraphNotSet)?;

        let names = self
            .starting_vertices
            .ok_or(ExplorerBuilderError::StartingVerticesNotSet)?;
        if names.is_empty() {
            return Err(ExploreError::EmptyStartSet.into());
        }

        let starts = names
            .into_iter()
            .map(|name| {
                graph
                    .resolve(&name)
                    .ok_or(ExploreError::UnknownStart { name })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let n_workers = self.n_workers.ok_or(ExplorerBuilderError::NWorkersNotSet)?;
        let parallel = ParallelBfs::new(n_workers)?;

        Ok(Explorer {
            graph,
            starts,
            parallel,
        })
    }

    pub fn build(mut self) -> Result<Explorer<'g>, ExplorerBuilderError> {
        self.n_workers.get_or_insert(1);

        self.build_no_defaults()
    }
}

/// Both strategies' results on the same graph and starting frontier.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub sequential: Exploration,
    pub parallel: Exploration,
}

impl Comparison {
    #[must_use]
    pub fn agree(&self) -> bool {
        self.sequential.agrees_with(&self.parallel)
    }
}

/// A validated graph and starting frontier, ready to be explored.
#[derive(Debug, Clone)]
pub struct Explorer<'g> {
    graph: &'g Graph,
    starts: Vec<NodeId>,
    parallel: ParallelBfs,
}

impl Explorer<'_> {
    #[must_use]
    pub fn starts(&self) -> &[NodeId] {
        &self.starts
    }

    #[must_use]
    pub fn n_workers(&self) -> usize {
        self.parallel.n_workers()
    }

    pub fn explore(&self, strategy: &dyn ExplorationStrategy) -> Result<Exploration, ExploreError> {
        explore_graph(self.graph, strategy, &self.starts)
    }

    pub fn sequential(&self) -> Result<Exploration, ExploreError> {
        self.explore(&SequentialBfs)
    }

    pub fn parallel(&self) -> Result<Exploration, ExploreError> {
        self.explore(&self.parallel)
    }

    /// Runs the sequential search, then the parallel one.
    pub fn compare(&self) -> Result<Comparison, ExploreError> {
        let sequential = self.sequential()?;
        let parallel = self.parallel()?;

        let comparison = Comparison {
            sequential,
            parallel,
        };
        if !comparison.agree() {
            tracing::warn!("the two searches produced different results");
        }

        Ok(comparison)
    }
}
