//! The frontier actor: owns the queue of nodes waiting to be expanded.

use std::thread::{Scope, ScopedJoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::graph::NodeId;

enum FrontierMessage {
    TakeLevel(Sender<Vec<NodeId>>),
    Append(Vec<NodeId>),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrontierState {
    Running,
    Draining,
    Stopped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FrontierStats {
    pub(crate) levels_taken: usize,
    pub(crate) appended: usize,
    pub(crate) discarded: usize,
}

struct Frontier {
    queue: Vec<NodeId>,
    state: FrontierState,
    stats: FrontierStats,
}

impl Frontier {
    fn run(mut self, inbox: &Receiver<FrontierMessage>) -> FrontierStats {
        // Runs until every handle is dropped, even after a shutdown
        while let Ok(msg) = inbox.recv() {
            let running = self.state == FrontierState::Running;

            match msg {
                FrontierMessage::TakeLevel(reply) => {
                    let level = if running {
                        self.stats.levels_taken += 1;
                        std::mem::take(&mut self.queue)
                    } else {
                        Vec::new()
                    };
                    let _ = reply.send(level);
                }
                FrontierMessage::Append(batch) => {
                    if running {
                        self.stats.appended += batch.len();
                        self.queue.extend(batch);
                    } else {
                        self.stats.discarded += batch.len();
                    }
                }
                FrontierMessage::Shutdown => {
                    if running {
                        tracing::debug!("frontier draining, {} nodes left", self.queue.len());
                        self.stats.discarded += self.queue.len();
                        self.queue.clear();
                        self.state = FrontierState::Draining;
                    }
                }
            }
        }

        self.state = FrontierState::Stopped;
        tracing::debug!("frontier stopped");

        self.stats
    }
}

/// A client of the frontier actor. Every handle must be dropped for the actor to stop.
#[derive(Clone)]
pub(crate) struct FrontierHandle {
    tx: Sender<FrontierMessage>,
}

impl FrontierHandle {
    /// Starts the actor on `scope`, seeded with the first level.
    pub(crate) fn spawn<'scope>(
        scope: &'scope Scope<'scope, '_>,
        seed: Vec<NodeId>,
    ) -> (Self, ScopedJoinHandle<'scope, FrontierStats>) {
        let (tx, rx) = bounded(0);

        let frontier = Frontier {
            queue: seed,
            state: FrontierState::Running,
            stats: FrontierStats::default(),
        };
        let thread = scope.spawn(move || frontier.run(&rx));

        (Self { tx }, thread)
    }

    pub(crate) fn append(&self, batch: Vec<NodeId>) {
        let _ = self.tx.send(FrontierMessage::Append(batch));
    }

    /// Idempotent. Further appends are discarded and further levels are empty.
    pub(crate) fn shutdown(&self) {
        let _ = self.tx.send(FrontierMessage::Shutdown);
    }

    /// Creates a client that can take levels, with its own reply channel.
    pub(crate) fn taker(&self) -> LevelTaker {
        let (reply_tx, reply_rx) = bounded(1);
        LevelTaker {
            handle: self.clone(),
            reply_tx,
            reply_rx,
        }
    }
}

pub(crate) struct LevelTaker {
    handle: FrontierHandle,
    reply_tx: Sender<Vec<NodeId>>,
    reply_rx: Receiver<Vec<NodeId>>,
}

impl LevelTaker {
    /// Takes everything appended since the previous call. An empty level means the search is over.
    pub(crate) fn take_level(&mut self) -> Vec<NodeId> {
        let msg = FrontierMessage::TakeLevel(self.reply_tx.clone());
        if self.handle.tx.send(msg).is_err() {
            return Vec::new();
        }

        self.reply_rx.recv().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_level_resets_the_queue() {
        std::thread::scope(|s| {
            let (frontier, thread) = FrontierHandle::spawn(s, vec![0, 1]);
            let mut taker = frontier.taker();

            assert_eq!(taker.take_level(), [0, 1]);
            assert!(taker.take_level().is_empty());

            frontier.append(vec![2, 3]);
            frontier.append(vec![3]);
            assert_eq!(taker.take_level(), [2, 3, 3]);

            drop(taker);
            drop(frontier);
            let stats = thread.join().unwrap();
            assert_eq!(stats.levels_taken, 3);
            assert_eq!(stats.appended, 3);
        });
    }

    #[test]
    fn draining_discards_appends() {
        std::thread::scope(|s| {
            let (frontier, thread) = FrontierHandle::spawn(s, vec![5]);
            let mut taker = frontier.taker();

            frontier.shutdown();
            frontier.shutdown();
            frontier.append(vec![1, 2]);
            assert!(taker.take_level().is_empty());

            drop(taker);
            drop(frontier);
            let stats = thread.join().unwrap();
            assert_eq!(stats.levels_taken, 0);
            assert_eq!(stats.discarded, 3);
        });
    }

    #[test]
    fn concurrent_appends_all_land_in_the_next_level() {
        std::thread::scope(|s| {
            let (frontier, thread) = FrontierHandle::spawn(s, Vec::new());
            let mut taker = frontier.taker();

            std::thread::scope(|inner| {
                for t in 0..4 {
                    let frontier = frontier.clone();
                    inner.spawn(move || {
                        for i in 0..25 {
                            frontier.append(vec![t * 25 + i]);
                        }
                    });
                }
            });

            let mut level = taker.take_level();
            level.sort_unstable();
            assert_eq!(level, (0..100).collect::<Vec<_>>());

            drop(taker);
            drop(frontier);
            thread.join().unwrap();
        });
    }

    #[test]
    fn shutdown_discards_pending_nodes() {
        std::thread::scope(|s| {
            let (frontier, thread) = FrontierHandle::spawn(s, vec![0]);
            let mut taker = frontier.taker();

            assert_eq!(taker.take_level(), [0]);
            frontier.append(vec![1, 2]);
            frontier.shutdown();
            assert!(taker.take_level().is_empty());

            drop(taker);
            drop(frontier);
            let stats = thread.join().unwrap();
            assert_eq!(stats.levels_taken, 1);
            assert_eq!(stats.appended, 2);
            assert_eq!(stats.discarded, 2);
        });
    }
}
