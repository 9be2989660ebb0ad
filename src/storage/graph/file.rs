//! JSON graph files.
//!
//! # Format
//!
//! ```json
//! {
//!   "root": "City",
//!   "features": [
//!     {
//!       "name": "City",
//!       "speaks": ["The city sits on a river."],
//!       "discussed_amount": 0,
//!       "neighbors": [{ "target": "Olympics", "relation": "hosted" }]
//!     },
//!     { "name": "Olympics" }
//!   ]
//! }
//! ```
//!
//! `root`, `speaks`, `discussed_amount` and `neighbors` are optional.

use super::memory::FeatureGraph;
use crate::models::Feature;
use crate::storage::traits::FeatureStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level graph document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFile {
    /// Name of the root feature; defaults to the first feature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Features in graph order.
    pub features: Vec<FeatureRecord>,
}

/// A feature as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Unique name.
    pub name: String,
    /// Lines to speak.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub speaks: Vec<String>,
    /// Discussion count.
    #[serde(default)]
    pub discussed_amount: u32,
    /// Outgoing edges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub neighbors: Vec<NeighborRecord>,
}

/// An edge as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeighborRecord {
    /// Name of the target feature.
    pub target: String,
    /// Free-text relation label.
    #[serde(default)]
    pub relation: String,
}

/// Parses a graph from JSON text.
///
/// Relation labels that name no known direction are kept but logged.
///
/// # Errors
///
/// Returns [`Error::InvalidGraph`] for malformed JSON, duplicate names or
/// dangling edge targets.
pub fn parse_graph(json: &str) -> Result<FeatureGraph> {
    let file: GraphFile =
        serde_json::from_str(json).map_err(|e| Error::InvalidGraph(e.to_string()))?;
    from_graph_file(file)
}

/// Builds a graph from a parsed document.
///
/// # Errors
///
/// Returns [`Error::InvalidGraph`] if the document does not describe a valid graph.
pub fn from_graph_file(file: GraphFile) -> Result<FeatureGraph> {
    let mut builder = FeatureGraph::builder();
    let mut edges = Vec::new();

    for record in file.features {
        for neighbor in record.neighbors {
            edges.push((record.name.clone(), neighbor.target, neighbor.relation));
        }
        let mut feature = Feature::new(record.name).with_discussed_amount(record.discussed_amount);
        feature.speaks = record.speaks;
        builder = builder.with_feature(feature);
    }
    for (from, to, relation) in edges {
        builder = builder.edge(from, to, relation);
    }
    if let Some(root) = file.root {
        builder = builder.root(root);
    }

    let graph = builder.build()?;
    for (feature, relation) in graph.unknown_relations() {
        tracing::warn!(feature, relation, "Relation label names no known direction");
    }
    Ok(graph)
}

/// Converts a graph back into its on-disk document.
#[must_use]
pub fn to_graph_file(graph: &FeatureGraph) -> GraphFile {
    let features = graph
        .features()
        .iter()
        .map(|f| FeatureRecord {
            name: f.name.clone(),
            speaks: f.speaks.clone(),
            discussed_amount: f.discussed_amount,
            neighbors: f
                .neighbors
                .iter()
                .map(|e| NeighborRecord {
                    target: graph.name_of(e.target).to_string(),
                    relation: e.relation.clone(),
                })
                .collect(),
        })
        .collect();

    GraphFile {
        root: Some(graph.name_of(graph.root()).to_string()),
        features,
    }
}

/// Loads a graph from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a valid graph.
pub fn load_graph(path: &Path) -> Result<FeatureGraph> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "read_graph_file".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;
    let graph = parse_graph(&contents)?;
    tracing::info!(path = %path.display(), features = graph.len(), "Loaded feature graph");
    Ok(graph)
}

/// Writes a graph, including discussion counts, to a JSON file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_graph(graph: &FeatureGraph, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&to_graph_file(graph)).map_err(|e| {
        Error::OperationFailed {
            operation: "serialize_graph".to_string(),
            cause: e.to_string(),
        }
    })?;
    std::fs::write(path, json).map_err(|e| Error::OperationFailed {
        operation: "write_graph_file".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;
    tracing::debug!(path = %path.display(), "Saved feature graph");
    Ok(())
}
