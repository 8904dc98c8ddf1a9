//! Defines the output sink that strategies report discovered nodes on.

use crossbeam_channel::{bounded, select, Receiver, Sender};
use serde_derive::Serialize;

/// The name of a discovered node and its distance from the starting frontier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeData {
    pub name: String,
    pub dist: usize,
}

impl NodeData {
    #[must_use]
    pub fn new(name: &str, dist: usize) -> Self {
        Self {
            name: name.to_owned(),
            dist,
        }
    }
}

/// Sending half of the sink: a stream of [`NodeData`] and a completion signal.
///
/// Both channels are unbuffered, so when `finish` returns every record has already been received.
#[derive(Debug)]
pub struct Sink {
    nodes: Sender<NodeData>,
    done: Sender<()>,
}

/// Receiving half of the sink, owned by the single consumer.
#[derive(Debug)]
pub struct SinkReceiver {
    nodes: Receiver<NodeData>,
    done: Receiver<()>,
}

impl Sink {
    #[must_use]
    pub fn channel() -> (Self, SinkReceiver) {
        let (nodes_tx, nodes_rx) = bounded(0);
        let (done_tx, done_rx) = bounded(0);

        (
            Self {
                nodes: nodes_tx,
                done: done_tx,
            },
            SinkReceiver {
                nodes: nodes_rx,
                done: done_rx,
            },
        )
    }

    /// Blocks until the consumer takes `node`. A consumer that went away is ignored.
    pub fn emit(&self, node: NodeData) {
        if self.nodes.send(node).is_err() {
            tracing::trace!("sink receiver dropped, discarding node");
        }
    }

    /// Signals completion. Consumes the sink so the signal can only be sent once.
    pub fn finish(self) {
        if self.done.send(()).is_err() {
            tracing::trace!("sink receiver dropped before completion");
        }
    }
}

impl SinkReceiver {
    /// Collects every emitted record until the completion signal, in emission order.
    ///
    /// If the sink is dropped without finishing (the strategy failed validation), returns whatever
    /// was received.
    #[must_use]
    pub fn gather(self) -> Vec<NodeData> {
        let mut nodes = Vec::new();

        loop {
            select! {
                recv(self.nodes) -> msg => match msg {
                    Ok(node) => nodes.push(node),
                    Err(_) => {
                        // The data stream only disconnects once the sink is gone
                        let _ = self.done.recv();
                        break;
                    }
                },
                recv(self.done) -> _ => {
                    nodes.extend(self.nodes.try_iter());
                    break;
                }
            }
        }

        nodes
    }
}
