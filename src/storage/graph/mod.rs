//! Feature graph backends.
//!
//! | Backend | Use Case |
//! |---------|----------|
//! | [`FeatureGraph`] | In-memory arena; the runtime store |
//! | [`load_graph`] / [`save_graph`] | JSON files on disk |
//!
//! # Example
//!
//! ```rust,ignore
//! use docent::storage::graph::{load_graph, save_graph};
//!
//! let graph = load_graph(Path::new("museum.json"))?;
//! // ... run a conversation ...
//! save_graph(&graph, Path::new("museum.json"))?;
//! ```

mod file;
mod memory;

pub use file::{
    FeatureRecord, GraphFile, NeighborRecord, from_graph_file, load_graph, parse_graph,
    save_graph, to_graph_file,
};
pub use memory::{FeatureGraph, GraphBuilder};
