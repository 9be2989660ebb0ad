//! Topic nodes of the feature graph.
//!
//! A [`Feature`] is a topic the dialogue can discuss. Features live in an
//! arena owned by [`FeatureGraph`](crate::storage::FeatureGraph) and refer to
//! one another through [`FeatureId`] indices, so cyclic relations such as
//! `contain`/`inside` pairs never form ownership cycles.

use super::direction::{Direction, relation_key};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a feature inside its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(usize);

impl FeatureId {
    /// Creates an ID from an arena index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labeled, directed edge to another feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// The neighbor this edge points to.
    pub target: FeatureId,
    /// Relation label as written in the source data.
    pub relation: String,
    /// Typed direction, when the label names one.
    pub direction: Option<Direction>,
}

impl Edge {
    /// Creates an edge, normalizing the label to a [`Direction`] if it names one.
    #[must_use]
    pub fn new(target: FeatureId, relation: impl Into<String>) -> Self {
        let relation = relation.into();
        let direction = Direction::from_relation(&relation);
        Self {
            target,
            relation,
            direction,
        }
    }

    /// Returns true if the label matches `relation`, ignoring case and
    /// treating spaces and underscores alike.
    #[must_use]
    pub fn is_relation(&self, relation: &str) -> bool {
        relation_key(&self.relation) == relation_key(relation)
    }
}

/// A topic node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Unique topic name.
    pub name: String,
    /// How many times this topic has become the active topic.
    pub discussed_amount: u32,
    /// Literal lines that can be spoken about the topic.
    pub speaks: Vec<String>,
    /// Outgoing edges.
    pub neighbors: Vec<Edge>,
}

impl Feature {
    /// Creates a feature with no lines and no neighbors.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            discussed_amount: 0,
            speaks: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    /// Adds a line to speak.
    #[must_use]
    pub fn with_speak(mut self, line: impl Into<String>) -> Self {
        self.speaks.push(line.into());
        self
    }

    /// Sets the discussion count.
    #[must_use]
    pub const fn with_discussed_amount(mut self, amount: u32) -> Self {
        self.discussed_amount = amount;
        self
    }

    /// Returns the targets of edges labeled `relation`, in edge order.
    pub fn neighbors_by_relation<'a>(
        &'a self,
        relation: &'a str,
    ) -> impl Iterator<Item = FeatureId> + 'a {
        self.neighbors
            .iter()
            .filter(move |edge| edge.is_relation(relation))
            .map(|edge| edge.target)
    }

    /// Returns every neighbor whose label names a direction.
    pub fn directional_neighbors(&self) -> impl Iterator<Item = (FeatureId, Direction)> + '_ {
        self.neighbors
            .iter()
            .filter_map(|edge| edge.direction.map(|d| (edge.target, d)))
    }

    /// Returns distinct neighbor IDs in first-seen order, excluding self-loops
    /// when `own_id` is given.
    #[must_use]
    pub fn distinct_neighbors(&self, own_id: Option<FeatureId>) -> Vec<FeatureId> {
        let mut seen = Vec::with_capacity(self.neighbors.len());
        for edge in &self.neighbors {
            if Some(edge.target) != own_id && !seen.contains(&edge.target) {
                seen.push(edge.target);
            }
        }
        seen
    }
}
