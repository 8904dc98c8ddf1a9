#![warn(clippy::must_use_candidate)]
#![deny(clippy::use_self)]
#![deny(clippy::if_not_else)]
#![deny(clippy::inconsistent_struct_constructor)]
#![deny(clippy::map_unwrap_or)]
#![deny(clippy::semicolon_if_nothing_returned)]
#![deny(clippy::similar_names)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::partialeq_to_none)]
#![deny(clippy::flat_map_option)]
#![deny(clippy::doc_markdown)]
#![deny(clippy::double_must_use)]
#![deny(clippy::iter_not_returning_iterator)]
#![deny(clippy::mod_module_files)]
#![deny(clippy::explicit_iter_loop)]
#![deny(clippy::implicit_clone)]
#![deny(clippy::iter_with_drain)]
#![deny(clippy::branches_sharing_code)]
#![deny(clippy::redundant_clone)]

pub mod builder;
pub mod dot;
pub mod error;
pub mod generate;
pub mod graph;
pub mod parallel;
pub mod report;
pub mod sequential;
pub mod sink;
pub mod strategy;

use cityhasher::CityHasher;

pub use builder::{Comparison, Explorer, ExplorerBuilder, ExplorerBuilderError};
pub use error::ExploreError;
pub use graph::{Graph, GraphBuilder, NodeId};
pub use parallel::{ParallelBfs, ParallelReport};
pub use sequential::SequentialBfs;
pub use sink::{NodeData, Sink, SinkReceiver};
pub use strategy::{explore_graph, Exploration, ExplorationStrategy};

/// A value that represents an undiscovered node's distance.
pub const UNDISCOVERED: usize = usize::MAX;

pub(crate) type FastMap<K, V> = std::collections::HashMap<K, V, CityHasher>;
