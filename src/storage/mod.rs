//! Storage layer.
//!
//! The dialogue core reads topics through the [`FeatureStore`] trait. The
//! in-memory [`FeatureGraph`] implements it and can be loaded from and saved
//! to JSON files.

pub mod graph;
pub mod traits;

pub use graph::{FeatureGraph, GraphBuilder, load_graph, save_graph};
pub use traits::FeatureStore;
