//! Feature store trait.
//!
//! The store owns the topic graph the dialogue talks about. The dialogue core
//! reads features through it and only ever writes discussion counts back;
//! graph structure (nodes and edges) is never mutated at runtime.
//!
//! # Operations
//!
//! | Operation | Complexity | Notes |
//! |-----------|------------|-------|
//! | `feature` | O(1) | By arena index |
//! | `find` | O(1) | Exact, case-sensitive name |
//! | `root` | O(1) | Topic used before any is active |
//! | `set_discussed_amount` | O(1) | Persists a count |

use crate::Result;
use crate::models::{Feature, FeatureId};

/// Read access to a topic graph plus discussion-count persistence.
///
/// # Implementor Notes
///
/// - IDs are dense: every `FeatureId` in `0..len()` must resolve.
/// - Every edge target must resolve inside the same store.
/// - A store is never empty; `root()` always names a feature.
pub trait FeatureStore {
    /// Number of features in the store.
    fn len(&self) -> usize;

    /// Returns true if the store holds no features.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieves a feature by ID.
    fn feature(&self, id: FeatureId) -> Option<&Feature>;

    /// Finds a feature by its exact name.
    fn find(&self, name: &str) -> Option<FeatureId>;

    /// The designated root topic.
    fn root(&self) -> FeatureId;

    /// Persists the discussion count of a feature.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID does not resolve or the write fails.
    fn set_discussed_amount(&mut self, id: FeatureId, amount: u32) -> Result<()>;

    /// All feature IDs, in graph order.
    fn ids(&self) -> Vec<FeatureId> {
        (0..self.len()).map(FeatureId::new).collect()
    }

    /// All feature names, in graph order.
    fn feature_names(&self) -> Vec<&str> {
        self.ids()
            .into_iter()
            .filter_map(|id| self.feature(id))
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Graph index of the named feature.
    fn index_of(&self, name: &str) -> Option<usize> {
        self.find(name).map(FeatureId::index)
    }

    /// Name of a feature, or an empty string for an unknown ID.
    fn name_of(&self, id: FeatureId) -> &str {
        self.feature(id).map_or("", |f| f.name.as_str())
    }
}
