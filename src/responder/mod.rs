//! Canned-response layer.
//!
//! Every non-empty utterance passes through a [`Preprocessor`] before the
//! dialogue core sees it. The preprocessor either stays silent, answers the
//! user directly, or rewrites the utterance into a directive the core parses
//! instead.
//!
//! A textual reply that starts with [`DIRECTIVE_PREFIX`] is a directive; see
//! [`Preprocessed::from_reply`].

mod patterns;

pub use patterns::{Exchange, MEMORY_LIMIT, PatternResponder, ResponseRule};

/// Marks a canned reply as a substitute utterance.
pub const DIRECTIVE_PREFIX: &str = "FORMAT:";

/// Outcome of preprocessing one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preprocessed {
    /// Final reply; the dialogue core is skipped for this turn.
    Reply(String),
    /// Substitute utterance for the dialogue core, already lowercased.
    Directive(String),
}

impl Preprocessed {
    /// Classifies raw canned output. Empty output means "no opinion".
    #[must_use]
    pub fn from_reply(output: &str) -> Option<Self> {
        if output.is_empty() {
            return None;
        }
        Some(output.strip_prefix(DIRECTIVE_PREFIX).map_or_else(
            || Self::Reply(output.to_string()),
            |payload| Self::Directive(payload.trim().to_lowercase()),
        ))
    }
}

/// First-pass responder consulted before the dialogue core.
pub trait Preprocessor {
    /// Inspects an utterance. `None` lets the core handle it unchanged.
    fn preprocess(&mut self, utterance: &str) -> Option<Preprocessed>;

    /// Records the reply the user finally received for `input`.
    fn remember(&mut self, _input: &str, _reply: &str) {}
}

/// Preprocessor that never intervenes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreprocessor;

impl Preprocessor for NoPreprocessor {
    fn preprocess(&mut self, _utterance: &str) -> Option<Preprocessed> {
        None
    }
}
