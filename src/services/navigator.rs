//! Topic navigation and novelty tracking.
//!
//! When the user gives no specific input the session asks the navigator
//! which topic to talk about next. Candidates are scored by novelty:
//!
//! ```text
//! freshness = 1 / (1 + discussed_amount)
//! recency   = min(turn - last_turn, novelty_amount) / novelty_amount   (1.0 if never discussed)
//! novelty   = freshness * recency
//! ```
//!
//! A topic discussed on the current turn scores 0; an untouched topic scores 1.

// Allow cast precision loss for score calculations where exact precision is not critical.
#![allow(clippy::cast_precision_loss)]

use crate::models::FeatureId;
use crate::storage::FeatureStore;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Default number of novelty suggestions and recency window, in turns.
pub const DEFAULT_NOVELTY_AMOUNT: usize = 5;

/// Novelty score of one topic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoveltyScore {
    score: f64,
    freshness: f64,
    recency: f64,
}

impl NoveltyScore {
    /// Combines the two components, each in `0.0..=1.0`.
    #[must_use]
    pub fn new(freshness: f64, recency: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&freshness), "freshness must be 0.0 to 1.0");
        debug_assert!((0.0..=1.0).contains(&recency), "recency must be 0.0 to 1.0");
        Self {
            score: freshness * recency,
            freshness,
            recency,
        }
    }

    /// Overall score (0.0 to 1.0, higher = fresher).
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Component from the lifetime discussion count.
    #[must_use]
    pub const fn freshness(&self) -> f64 {
        self.freshness
    }

    /// Component from turns since the topic was last discussed.
    #[must_use]
    pub const fn recency(&self) -> f64 {
        self.recency
    }
}

/// Novelty annotation appended to spoken replies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoveltyInfo {
    score: f64,
    related: Vec<String>,
}

impl NoveltyInfo {
    /// Creates an annotation.
    #[must_use]
    pub const fn new(score: f64, related: Vec<String>) -> Self {
        Self { score, related }
    }

    /// Novelty of the topic the annotation describes.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Fresh topics worth moving to next, neighbors first.
    #[must_use]
    pub fn related(&self) -> &[String] {
        &self.related
    }
}

impl fmt::Display for NoveltyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[novelty {:.2}", self.score)?;
        if !self.related.is_empty() {
            write!(f, " | related: {}", self.related.join(", "))?;
        }
        write!(f, "]")
    }
}

/// Chooses topics and remembers when each was last discussed.
#[derive(Debug, Clone)]
pub struct TopicNavigator {
    novelty_amount: usize,
    last_turn: HashMap<FeatureId, u32>,
}

impl Default for TopicNavigator {
    fn default() -> Self {
        Self::new(DEFAULT_NOVELTY_AMOUNT)
    }
}

impl TopicNavigator {
    /// Creates a navigator. `novelty_amount` caps the number of suggestions
    /// and sets the recency window; zero is treated as one.
    #[must_use]
    pub fn new(novelty_amount: usize) -> Self {
        Self {
            novelty_amount: novelty_amount.max(1),
            last_turn: HashMap::new(),
        }
    }

    /// The configured novelty amount.
    #[must_use]
    pub const fn novelty_amount(&self) -> usize {
        self.novelty_amount
    }

    /// Marks a topic as discussed on `turn`.
    pub fn record(&mut self, topic: FeatureId, turn: u32) {
        self.last_turn.insert(topic, turn);
    }

    /// Turn on which a topic was last discussed.
    #[must_use]
    pub fn last_discussed(&self, topic: FeatureId) -> Option<u32> {
        self.last_turn.get(&topic).copied()
    }

    /// Scores a topic at `turn`.
    #[must_use]
    pub fn score<S: FeatureStore + ?Sized>(
        &self,
        store: &S,
        topic: FeatureId,
        turn: u32,
    ) -> NoveltyScore {
        let discussed = store.feature(topic).map_or(0, |f| f.discussed_amount);
        let freshness = 1.0 / (1.0 + f64::from(discussed));
        let recency = self.last_discussed(topic).map_or(1.0, |last| {
            let elapsed = turn.saturating_sub(last) as usize;
            elapsed.min(self.novelty_amount) as f64 / self.novelty_amount as f64
        });
        NoveltyScore::new(freshness, recency)
    }

    /// Picks the next topic to discuss.
    ///
    /// Prefers the freshest neighbor of `current`. Falls back to the freshest
    /// topic anywhere in the graph when no neighbor scores above zero, and to
    /// `current` itself when the graph has nothing else. Ties go to the lowest
    /// ID, so the choice is deterministic.
    #[must_use]
    pub fn next_topic<S: FeatureStore + ?Sized>(
        &self,
        store: &S,
        current: FeatureId,
        turn: u32,
    ) -> FeatureId {
        let mut neighbors = store
            .feature(current)
            .map(|f| f.distinct_neighbors(Some(current)))
            .unwrap_or_default();
        neighbors.sort_unstable();

        if let Some((id, score)) = self.freshest(store, neighbors, turn) {
            if score > 0.0 {
                tracing::debug!(from = %current, to = %id, score, "Moving to neighbor");
                return id;
            }
        }

        let others = store.ids().into_iter().filter(|&id| id != current);
        match self.freshest(store, others, turn) {
            Some((id, score)) => {
                tracing::debug!(from = %current, to = %id, score, "Moving to unrelated topic");
                id
            },
            None => current,
        }
    }

    /// Returns the highest-scoring candidate; earlier candidates win ties.
    fn freshest<S, I>(&self, store: &S, candidates: I, turn: u32) -> Option<(FeatureId, f64)>
    where
        S: FeatureStore + ?Sized,
        I: IntoIterator<Item = FeatureId>,
    {
        let mut best: Option<(FeatureId, f64)> = None;
        for id in candidates {
            let score = self.score(store, id, turn).score();
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((id, score));
            }
        }
        best
    }

    /// Builds the novelty annotation for `topic`.
    ///
    /// Suggests up to `novelty_amount` other topics, fresh neighbors first,
    /// then the rest of the graph, each group ordered by score.
    #[must_use]
    pub fn novelty<S: FeatureStore + ?Sized>(
        &self,
        store: &S,
        topic: FeatureId,
        turn: u32,
    ) -> NoveltyInfo {
        let score = self.score(store, topic, turn).score();

        let neighbors = store
            .feature(topic)
            .map(|f| f.distinct_neighbors(Some(topic)))
            .unwrap_or_default();
        let rest: Vec<FeatureId> = store
            .ids()
            .into_iter()
            .filter(|id| *id != topic && !neighbors.contains(id))
            .collect();

        let related = self
            .ranked(store, neighbors, turn)
            .into_iter()
            .chain(self.ranked(store, rest, turn))
            .take(self.novelty_amount)
            .map(|id| store.name_of(id).to_string())
            .collect();

        NoveltyInfo::new(score, related)
    }

    /// Orders candidates by descending score, then ascending ID.
    fn ranked<S: FeatureStore + ?Sized>(
        &self,
        store: &S,
        candidates: Vec<FeatureId>,
        turn: u32,
    ) -> Vec<FeatureId> {
        let mut scored: Vec<(FeatureId, f64)> = candidates
            .into_iter()
            .map(|id| (id, self.score(store, id, turn).score()))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.into_iter().map(|(id, _)| id).collect()
    }
}
