//! Parsed utterances.

use super::direction::Direction;
use super::feature::FeatureId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of question asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Question {
    /// "What is ...", or any input ending in a question mark.
    What,
    /// "Where is ...".
    Where,
    /// "When was ...".
    When,
}

impl Question {
    /// Returns the question kind as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::What => "what",
            Self::Where => "where",
            Self::When => "when",
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured query about one topic.
///
/// Immutable once built; construct through [`Query::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    topic: FeatureId,
    question: Option<Question>,
    direction: Option<Direction>,
}

impl Query {
    /// Creates a query.
    #[must_use]
    pub const fn new(
        topic: FeatureId,
        question: Option<Question>,
        direction: Option<Direction>,
    ) -> Self {
        Self {
            topic,
            question,
            direction,
        }
    }

    /// Creates a plain statement about a topic.
    #[must_use]
    pub const fn statement(topic: FeatureId) -> Self {
        Self::new(topic, None, None)
    }

    /// The topic the query is about.
    #[must_use]
    pub const fn topic(&self) -> FeatureId {
        self.topic
    }

    /// The question kind, if any.
    #[must_use]
    pub const fn question(&self) -> Option<Question> {
        self.question
    }

    /// The relation asked about, if any.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Whether the input was an explicit question.
    #[must_use]
    pub const fn is_question(&self) -> bool {
        self.question.is_some()
    }

    /// Whether a relation was specified.
    #[must_use]
    pub const fn has_direction(&self) -> bool {
        self.direction.is_some()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "topic={}", self.topic)?;
        match self.question {
            Some(q) => write!(f, " question={q}")?,
            None => write!(f, " question=none")?,
        }
        match self.direction {
            Some(d) => write!(f, " direction={d}"),
            None => write!(f, " direction=none"),
        }
    }
}
