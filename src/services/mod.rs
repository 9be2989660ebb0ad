//! Dialogue services.
//!
//! The parser, navigator and renderer each work against a
//! [`FeatureStore`](crate::storage::FeatureStore); the session drives them
//! turn by turn.

mod navigator;
mod query_parser;
mod renderer;
mod session;

pub use navigator::{DEFAULT_NOVELTY_AMOUNT, NoveltyInfo, NoveltyScore, TopicNavigator};
pub use query_parser::{
    DirectionPolicy, PUNCTUATION, QueryParser, classify, normalize, scan_direction, strip,
};
pub use renderer::{AnswerRenderer, IDK, join_and};
pub use session::{DONT_UNDERSTAND, DialogueSession, SAID_ALL};
