//! In-memory feature graph.
//!
//! Features are stored in an arena and addressed by [`FeatureId`]. Edges hold
//! IDs, never references, so cycles between topics are harmless.

use crate::models::{Edge, Feature, FeatureId};
use crate::storage::traits::FeatureStore;
use crate::{Error, Result};
use std::collections::HashMap;

/// Arena-backed topic graph.
///
/// # Example
///
/// ```rust
/// use docent::storage::{FeatureGraph, FeatureStore};
///
/// let graph = FeatureGraph::builder()
///     .feature("City", ["A busy city."])
///     .feature("Olympics", Vec::<String>::new())
///     .edge("City", "Olympics", "hosted")
///     .build()
///     .unwrap();
///
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.index_of("Olympics"), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct FeatureGraph {
    features: Vec<Feature>,
    by_name: HashMap<String, FeatureId>,
    root: FeatureId,
}

impl FeatureGraph {
    /// Starts building a graph.
    #[must_use]
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// All features, in graph order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Returns `(feature name, relation)` for every edge whose label names no
    /// known direction.
    ///
    /// Such edges still work for exact relation lookups ("won", custom labels)
    /// but never appear in neighbor-relation sentences.
    #[must_use]
    pub fn unknown_relations(&self) -> Vec<(&str, &str)> {
        self.features
            .iter()
            .flat_map(|f| {
                f.neighbors
                    .iter()
                    .filter(|e| e.direction.is_none() && !e.relation.trim().is_empty())
                    .map(move |e| (f.name.as_str(), e.relation.as_str()))
            })
            .collect()
    }

    /// Number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.features.iter().map(|f| f.neighbors.len()).sum()
    }
}

impl FeatureStore for FeatureGraph {
    fn len(&self) -> usize {
        self.features.len()
    }

    fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(id.index())
    }

    fn find(&self, name: &str) -> Option<FeatureId> {
        self.by_name.get(name).copied()
    }

    fn root(&self) -> FeatureId {
        self.root
    }

    fn set_discussed_amount(&mut self, id: FeatureId, amount: u32) -> Result<()> {
        let feature = self
            .features
            .get_mut(id.index())
            .ok_or_else(|| Error::UnknownFeature(id.to_string()))?;
        feature.discussed_amount = amount;
        Ok(())
    }
}

/// A pending edge, addressed by names until the graph is built.
#[derive(Debug, Clone)]
struct PendingEdge {
    from: String,
    to: String,
    relation: String,
}

/// Builder for [`FeatureGraph`].
///
/// Features and edges are named; names are resolved and validated by
/// [`GraphBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    features: Vec<Feature>,
    edges: Vec<PendingEdge>,
    root: Option<String>,
}

impl GraphBuilder {
    /// Adds a feature with the given lines to speak.
    #[must_use]
    pub fn feature<I, S>(mut self, name: impl Into<String>, speaks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut feature = Feature::new(name);
        feature.speaks = speaks.into_iter().map(Into::into).collect();
        self.features.push(feature);
        self
    }

    /// Adds a fully formed feature. Its existing edges are discarded; use
    /// [`GraphBuilder::edge`] to connect it.
    #[must_use]
    pub fn with_feature(mut self, mut feature: Feature) -> Self {
        feature.neighbors.clear();
        self.features.push(feature);
        self
    }

    /// Adds a labeled edge from one named feature to another.
    #[must_use]
    pub fn edge(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        self.edges.push(PendingEdge {
            from: from.into(),
            to: to.into(),
            relation: relation.into(),
        });
        self
    }

    /// Designates the root feature. Defaults to the first feature.
    #[must_use]
    pub fn root(mut self, name: impl Into<String>) -> Self {
        self.root = Some(name.into());
        self
    }

    /// Resolves names and builds the graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGraph`] if the graph is empty, a name is
    /// duplicated, or an edge or the root names a missing feature.
    pub fn build(self) -> Result<FeatureGraph> {
        if self.features.is_empty() {
            return Err(Error::InvalidGraph("graph has no features".to_string()));
        }

        let mut by_name = HashMap::with_capacity(self.features.len());
        for (i, feature) in self.features.iter().enumerate() {
            if by_name
                .insert(feature.name.clone(), FeatureId::new(i))
                .is_some()
            {
                return Err(Error::InvalidGraph(format!(
                    "duplicate feature name: {}",
                    feature.name
                )));
            }
        }

        let resolve = |name: &str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| Error::InvalidGraph(format!("unknown feature: {name}")))
        };

        let mut features = self.features;
        for pending in self.edges {
            let from = resolve(&pending.from)?;
            let to = resolve(&pending.to)?;
            features[from.index()]
                .neighbors
                .push(Edge::new(to, pending.relation));
        }

        let root = match self.root {
            Some(name) => resolve(&name)?,
            None => FeatureId::new(0),
        };

        tracing::debug!(
            features = features.len(),
            root = %features[root.index()].name,
            "Built feature graph"
        );

        Ok(FeatureGraph {
            features,
            by_name,
            root,
        })
    }
}
