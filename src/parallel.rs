//! Level-synchronous parallel BFS.
//!
//! The coordinator takes one level at a time from the frontier actor, hands its nodes to a pool of
//! workers over a shared jobs channel and waits on a barrier until every node of the level has been
//! processed. Workers query and update distances through the distance actor and append improved
//! neighbours to the frontier actor, so neither table is ever shared behind a lock.
//!
//! A node can be appended to the same level by two workers that raced on it. Those duplicates are
//! collapsed when the level is dispatched, and any later expansion finds every neighbour already
//! at its final distance, so there is no explored set.

mod barrier;
mod distances;
mod frontier;
mod worker;

use crossbeam_channel::bounded;
use itertools::Itertools;

use crate::{
    error::ExploreError,
    graph::{Graph, NodeId},
    parallel::{
        barrier::LevelBarrier, distances::DistanceHandle, frontier::FrontierHandle,
        worker::Worker,
    },
    sink::Sink,
    strategy::{validate_starts, ExplorationStrategy},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoordinatorState {
    Init,
    Running,
    Draining,
    Terminated,
}

/// Statistics of one parallel search, returned by [`ParallelBfs::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParallelReport {
    /// Number of non-empty levels expanded.
    pub levels: usize,
    /// Number of nodes expanded across all workers.
    pub expanded: u64,
    /// Number of neighbours staged for a next level, duplicates included.
    pub staged: u64,
    /// Number of duplicate nodes removed from levels before dispatch.
    pub duplicates: usize,
    /// Every distance the distance actor accepted, in the order it applied them.
    pub assignments: Vec<(NodeId, usize)>,
    /// Number of updates the distance actor refused because they did not lower a distance.
    pub rejected_updates: u64,
    /// The final distance table, sorted by node.
    pub distances: Vec<(NodeId, usize)>,
}

/// Parallel BFS over a fixed number of workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelBfs {
    n_workers: usize,
}

impl ParallelBfs {
    pub fn new(n_workers: usize) -> Result<Self, ExploreError> {
        if n_workers < 1 {
            return Err(ExploreError::InvalidWorkerCount { n_workers });
        }

        Ok(Self { n_workers })
    }

    #[must_use]
    pub fn n_workers(&self) -> usize {
        self.n_workers
    }

    /// Runs the search and returns what the actors saw. Every reachable node is sent exactly once
    /// on `sink`, which is finished before returning.
    pub fn run(
        &self,
        graph: &Graph,
        starts: &[NodeId],
        sink: Sink,
    ) -> Result<ParallelReport, ExploreError> {
        let starts = validate_starts(graph, starts)?;

        let mut state = CoordinatorState::Init;
        tracing::debug!("coordinator {state:?} with {} workers", self.n_workers);

        let mut report = ParallelReport::default();
        let barrier = LevelBarrier::new();

        // No level is ever wider than the graph
        let n_threads = self.n_workers.min(graph.num_nodes());
        if n_threads < self.n_workers {
            tracing::debug!("starting {n_threads} of {} workers", self.n_workers);
        }

        std::thread::scope(|s| {
            let (frontier, frontier_thread) = FrontierHandle::spawn(s, starts.clone());
            let (distances, distances_thread) = DistanceHandle::spawn(s, &starts);
            let (jobs_tx, jobs_rx) = bounded::<NodeId>(0);
            let sink = &sink;
            let barrier = &barrier;

            // On failure the handles spawned so far see the jobs channel close and exit
            let workers = (0..n_threads)
                .map(|id| {
                    let worker = Worker {
                        id,
                        graph,
                        jobs: jobs_rx.clone(),
                        frontier: frontier.clone(),
                        distances: distances.client(),
                        sink,
                        barrier,
                    };
                    std::thread::Builder::new()
                        .name(format!("worker-{id}"))
                        .spawn_scoped(s, move || worker.run())
                        .map_err(|source| ExploreError::WorkerSpawn { id, source })
                })
                .collect::<Result<Vec<_>, _>>()?;
            drop(jobs_rx);

            let mut taker = frontier.taker();
            state = CoordinatorState::Running;
            tracing::debug!("coordinator {state:?}");

            let mut depth = 0;

            loop {
                let level = taker.take_level();

                // No more nodes in the frontier: we are done
                if level.is_empty() {
                    state = CoordinatorState::Draining;
                    tracing::debug!("coordinator {state:?} at depth {depth}");
                    break;
                }

                let taken = level.len();
                let level = level.into_iter().unique().collect::<Vec<_>>();
                report.duplicates += taken - level.len();

                tracing::info!("depth {depth} new {}", level.len());

                // Workers in this level must finish appending before the next level is taken
                let width = level.len();
                barrier.arm(width);
                let dispatched = level
                    .into_iter()
                    .take_while(|&node| jobs_tx.send(node).is_ok())
                    .count();
                if dispatched < width {
                    // Every worker is gone, which joining them re-raises
                    tracing::error!("no worker left at depth {depth}");
                    break;
                }
                barrier.wait();

                report.levels += 1;
                depth += 1;
            }

            drop(jobs_tx);

            for worker in workers {
                let stats = worker
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                report.expanded += stats.expanded;
                report.staged += stats.staged;
            }

            report.distances = distances.dump();

            frontier.shutdown();
            distances.shutdown();
            drop(taker);
            drop(frontier);
            drop(distances);

            let frontier_stats = frontier_thread
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            let distance_stats = distances_thread
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

            tracing::debug!(
                "frontier took {} levels, received {} nodes and discarded {}",
                frontier_stats.levels_taken,
                frontier_stats.appended,
                frontier_stats.discarded,
            );
            tracing::debug!(
                "distance table answered {} queries, rejected {} updates",
                distance_stats.queries,
                distance_stats.rejected,
            );

            report.assignments = distance_stats.assignments;
            report.rejected_updates = distance_stats.rejected;

            Ok::<_, ExploreError>(())
        })?;

        sink.finish();

        state = CoordinatorState::Terminated;
        tracing::debug!("coordinator {state:?} after {} levels", report.levels);

        Ok(report)
    }
}

impl ExplorationStrategy for ParallelBfs {
    fn name(&self) -> &str {
        "Parallel"
    }

    fn explore(&self, graph: &Graph, starts: &[NodeId], sink: Sink) -> Result<(), ExploreError> {
        self.run(graph, starts, sink).map(|_| ())
    }
}
