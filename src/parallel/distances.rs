//! The distance actor: owns the node to distance mapping.

use std::thread::{Scope, ScopedJoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::{graph::NodeId, FastMap, UNDISCOVERED};

enum DistanceMessage {
    Query { node: NodeId, reply: Sender<usize> },
    Update { node: NodeId, dist: usize },
    Dump(Sender<Vec<(NodeId, usize)>>),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DistanceState {
    Running,
    Draining,
    Stopped,
}

/// What the distance actor saw during one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DistanceStats {
    pub(crate) queries: u64,
    /// Every update that lowered a distance, in the order it was applied.
    pub(crate) assignments: Vec<(NodeId, usize)>,
    pub(crate) rejected: u64,
}

struct DistanceTable {
    distances: FastMap<NodeId, usize>,
    state: DistanceState,
    stats: DistanceStats,
}

impl DistanceTable {
    fn get(&self, node: NodeId) -> usize {
        self.distances.get(&node).copied().unwrap_or(UNDISCOVERED)
    }

    /// Distances only ever decrease. Anything else is refused.
    fn update(&mut self, node: NodeId, dist: usize) {
        if dist < self.get(node) {
            self.distances.insert(node, dist);
            self.stats.assignments.push((node, dist));
        } else {
            tracing::trace!("rejected update of node {node} to distance {dist}");
            self.stats.rejected += 1;
        }
    }

    fn run(mut self, inbox: &Receiver<DistanceMessage>) -> DistanceStats {
        while let Ok(msg) = inbox.recv() {
            match msg {
                DistanceMessage::Query { node, reply } => {
                    self.stats.queries += 1;
                    let _ = reply.send(self.get(node));
                }
                DistanceMessage::Update { node, dist } => {
                    if self.state == DistanceState::Running {
                        self.update(node, dist);
                    }
                }
                DistanceMessage::Dump(reply) => {
                    let mut dump = self
                        .distances
                        .iter()
                        .map(|(&node, &dist)| (node, dist))
                        .collect::<Vec<_>>();
                    dump.sort_unstable();
                    let _ = reply.send(dump);
                }
                DistanceMessage::Shutdown => {
                    if self.state == DistanceState::Running {
                        tracing::debug!("distance table draining, {} nodes", self.distances.len());
                        self.state = DistanceState::Draining;
                    }
                }
            }
        }

        self.state = DistanceState::Stopped;
        tracing::debug!("distance table stopped");

        self.stats
    }
}

/// Shared handle to the distance actor. Queries need a [`DistanceClient`].
#[derive(Clone)]
pub(crate) struct DistanceHandle {
    tx: Sender<DistanceMessage>,
}

impl DistanceHandle {
    /// Starts the actor on `scope` with every starting node at distance 0.
    pub(crate) fn spawn<'scope>(
        scope: &'scope Scope<'scope, '_>,
        starts: &[NodeId],
    ) -> (Self, ScopedJoinHandle<'scope, DistanceStats>) {
        let (tx, rx) = bounded(0);

        let table = DistanceTable {
            distances: starts.iter().map(|&node| (node, 0)).collect(),
            state: DistanceState::Running,
            stats: DistanceStats::default(),
        };
        let thread = scope.spawn(move || table.run(&rx));

        (Self { tx }, thread)
    }

    /// Creates a client with a private reply channel, so its answers never reach anyone else.
    pub(crate) fn client(&self) -> DistanceClient {
        let (reply_tx, reply_rx) = bounded(1);
        DistanceClient {
            tx: self.tx.clone(),
            reply_tx,
            reply_rx,
        }
    }

    /// Snapshot of the table, sorted by node.
    pub(crate) fn dump(&self) -> Vec<(NodeId, usize)> {
        let (reply_tx, reply_rx) = bounded(1);
        if self.tx.send(DistanceMessage::Dump(reply_tx)).is_err() {
            return Vec::new();
        }
        reply_rx.recv().unwrap_or_default()
    }

    /// Idempotent. Further updates are ignored.
    pub(crate) fn shutdown(&self) {
        let _ = self.tx.send(DistanceMessage::Shutdown);
    }
}

/// Owned by exactly one worker for the duration of a search. Deliberately not `Clone`.
pub(crate) struct DistanceClient {
    tx: Sender<DistanceMessage>,
    reply_tx: Sender<usize>,
    reply_rx: Receiver<usize>,
}

impl DistanceClient {
    /// Returns [`UNDISCOVERED`] for a node that has no distance yet.
    pub(crate) fn query(&mut self, node: NodeId) -> usize {
        let msg = DistanceMessage::Query {
            node,
            reply: self.reply_tx.clone(),
        };
        if self.tx.send(msg).is_err() {
            return UNDISCOVERED;
        }

        self.reply_rx.recv().unwrap_or(UNDISCOVERED)
    }

    pub(crate) fn update(&mut self, node: NodeId, dist: usize) {
        let _ = self.tx.send(DistanceMessage::Update { node, dist });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_are_at_zero_and_the_rest_is_undiscovered() {
        std::thread::scope(|s| {
            let (distances, thread) = DistanceHandle::spawn(s, &[3, 4]);
            let mut client = distances.client();

            assert_eq!(client.query(3), 0);
            assert_eq!(client.query(4), 0);
            assert_eq!(client.query(0), UNDISCOVERED);

            drop(client);
            drop(distances);
            assert_eq!(thread.join().unwrap().queries, 3);
        });
    }

    #[test]
    fn updates_only_ever_lower_a_distance() {
        std::thread::scope(|s| {
            let (distances, thread) = DistanceHandle::spawn(s, &[0]);
            let mut client = distances.client();

            client.update(1, 3);
            client.update(1, 2);
            client.update(1, 2);
            client.update(1, 5);
            client.update(0, 1);
            assert_eq!(client.query(1), 2);
            assert_eq!(distances.dump(), [(0, 0), (1, 2)]);

            drop(client);
            drop(distances);
            let stats = thread.join().unwrap();
            assert_eq!(stats.assignments, [(1, 3), (1, 2)]);
            assert_eq!(stats.rejected, 3);
        });
    }

    #[test]
    fn replies_reach_the_client_that_asked() {
        std::thread::scope(|s| {
            let (distances, thread) = DistanceHandle::spawn(s, &[]);
            {
                let mut client = distances.client();
                for node in 0..64 {
                    client.update(node, node);
                }
            }

            std::thread::scope(|inner| {
                for t in 0..8 {
                    let mut client = distances.client();
                    inner.spawn(move || {
                        for i in 0..200 {
                            let node = (t * 7 + i) % 64;
                            assert_eq!(client.query(node), node);
                        }
                    });
                }
            });

            drop(distances);
            thread.join().unwrap();
        });
    }

    #[test]
    fn shutdown_freezes_the_table() {
        std::thread::scope(|s| {
            let (distances, thread) = DistanceHandle::spawn(s, &[0]);
            let mut client = distances.client();

            distances.shutdown();
            distances.shutdown();
            client.update(1, 1);
            assert_eq!(client.query(1), UNDISCOVERED);

            drop(client);
            drop(distances);
            assert!(thread.join().unwrap().assignments.is_empty());
        });
    }
}
