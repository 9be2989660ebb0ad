//! Regex-driven canned responses.
//!
//! Rules are tried in order; the first whose pattern matches the utterance
//! (and whose `after` pattern, if any, matches the previous reply) answers.
//! Templates may reference capture groups with `$1` or `${name}`.

use super::{Preprocessed, Preprocessor};
use crate::config::ResponseSettings;
use crate::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::collections::VecDeque;

/// Number of exchanges kept in conversation memory.
pub const MEMORY_LIMIT: usize = 16;

/// One compiled canned-response rule.
#[derive(Debug, Clone)]
pub struct ResponseRule {
    pattern: Regex,
    template: String,
    after: Option<Regex>,
}

impl ResponseRule {
    /// Compiles a rule. Patterns are case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either pattern fails to compile.
    pub fn new(pattern: &str, template: impl Into<String>, after: Option<&str>) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            template: template.into(),
            after: after.map(compile).transpose()?,
        })
    }

    /// Expands the template if the rule applies.
    fn apply(&self, utterance: &str, last_reply: Option<&str>) -> Option<String> {
        if let Some(after) = &self.after {
            if !last_reply.is_some_and(|reply| after.is_match(reply)) {
                return None;
            }
        }
        let captures = self.pattern.captures(utterance)?;
        let mut output = String::new();
        captures.expand(&self.template, &mut output);
        Some(output)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::InvalidInput(format!("invalid response pattern '{pattern}': {e}")))
}

/// One remembered turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// What the user said.
    pub input: String,
    /// What the user was told.
    pub reply: String,
}

/// Ordered canned-response rules with a short conversation memory.
///
/// # Example
///
/// ```rust
/// use docent::responder::{PatternResponder, Preprocessed, Preprocessor, ResponseRule};
///
/// let mut responder = PatternResponder::new(vec![
///     ResponseRule::new(r"^hello\b", "Hello! Ask me about a place.", None).unwrap(),
///     ResponseRule::new(r"^who hosted (.+)$", "FORMAT: where was $1 hosted", None).unwrap(),
/// ]);
///
/// assert_eq!(
///     responder.preprocess("who hosted the olympics"),
///     Some(Preprocessed::Directive("where was the olympics hosted".to_string()))
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternResponder {
    rules: Vec<ResponseRule>,
    memory: VecDeque<Exchange>,
}

impl PatternResponder {
    /// Creates a responder from compiled rules.
    #[must_use]
    pub fn new(rules: Vec<ResponseRule>) -> Self {
        Self {
            rules,
            memory: VecDeque::with_capacity(MEMORY_LIMIT),
        }
    }

    /// Compiles rules from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern fails to compile.
    pub fn from_settings(settings: &[ResponseSettings]) -> Result<Self> {
        let rules = settings
            .iter()
            .map(|s| ResponseRule::new(&s.pattern, s.template.clone(), s.after.as_deref()))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(rules = rules.len(), "Compiled canned responses");
        Ok(Self::new(rules))
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Remembered exchanges, oldest first.
    pub fn memory(&self) -> impl Iterator<Item = &Exchange> {
        self.memory.iter()
    }
}

impl Preprocessor for PatternResponder {
    fn preprocess(&mut self, utterance: &str) -> Option<Preprocessed> {
        let last_reply = self.memory.back().map(|e| e.reply.as_str());
        let output = self
            .rules
            .iter()
            .find_map(|rule| rule.apply(utterance, last_reply))?;
        let outcome = Preprocessed::from_reply(&output);
        tracing::debug!(utterance, ?outcome, "Canned response matched");
        outcome
    }

    fn remember(&mut self, input: &str, reply: &str) {
        if self.memory.len() == MEMORY_LIMIT {
            self.memory.pop_front();
        }
        self.memory.push_back(Exchange {
            input: input.to_string(),
            reply: reply.to_string(),
        });
    }
}
