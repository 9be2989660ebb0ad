//! # Docent
//!
//! A rule-based dialogue engine over a small labeled knowledge graph.
//!
//! Docent turns free-text utterances into structured queries about topics
//! in a feature graph, renders the answers as sentences, and, when the user
//! says nothing in particular, picks the freshest topic to talk about next.
//!
//! ## Features
//!
//! - Longest-match topic resolution and a direction-word relation scan
//! - Compass, containment and verb relations with typed inverses
//! - Novelty-driven topic navigation with paginated answers
//! - Regex canned responses that can answer directly or rewrite the input
//! - JSON graph files with discussion counts written back on save
//!
//! ## Example
//!
//! ```rust
//! use docent::{DialogueSession, FeatureGraph};
//!
//! let graph = FeatureGraph::builder()
//!     .feature("City", ["The city sits on a river."])
//!     .feature("Olympics", Vec::<String>::new())
//!     .edge("City", "Olympics", "hosted")
//!     .build()
//!     .unwrap();
//!
//! let mut session = DialogueSession::new(graph);
//! let reply = session.respond("What did the City host?", false);
//! assert!(reply.starts_with("City hosted Olympics."));
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod models;
pub mod observability;
pub mod responder;
pub mod services;
pub mod storage;

pub use config::DocentConfig;
pub use models::{Direction, Feature, FeatureId, Query, Question, SayBuffer};
pub use responder::{PatternResponder, Preprocessed, Preprocessor};
pub use services::{DialogueSession, QueryParser, TopicNavigator};
pub use storage::{FeatureGraph, FeatureStore, load_graph, save_graph};

/// Error type for docent operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed canned-response patterns or CLI input |
/// | `OperationFailed` | File I/O, config or JSON parsing, logging setup |
/// | `UnknownFeature` | A feature ID or name that is not in the graph |
/// | `InvalidGraph` | Empty graphs, duplicate names, dangling edge targets |
///
/// None of these cross [`DialogueSession::respond`]; the session turns every
/// runtime condition into a reply.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Graph or config files cannot be read or written
    /// - JSON or TOML deserialization fails
    /// - The logging subscriber cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A feature was referenced that the graph does not contain.
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    /// The graph failed validation.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
}

/// Result type alias for docent operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "load_graph".to_string(),
            cause: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'load_graph' failed: missing");

        let err = Error::UnknownFeature("#7".to_string());
        assert_eq!(err.to_string(), "unknown feature: #7");

        let err = Error::InvalidGraph("edge to Nowhere".to_string());
        assert_eq!(err.to_string(), "invalid graph: edge to Nowhere");
    }
}
