//! Data models for docent.
//!
//! This module contains the core data structures shared by the parser,
//! navigator, renderer and session.

mod buffer;
pub mod direction;
mod feature;
mod query;

pub use buffer::SayBuffer;
pub use direction::{DIRECTION_ALIASES, DIRECTION_WORDS, Direction, relation_key};
pub use feature::{Edge, Feature, FeatureId};
pub use query::{Query, Question};
