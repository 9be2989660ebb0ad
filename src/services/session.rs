//! Dialogue session.
//!
//! A [`DialogueSession`] owns the feature store and the per-conversation
//! state: the active topic, the say-buffer being paginated, and the turn
//! counter. [`DialogueSession::respond`] consumes one utterance and always
//! produces one reply string; nothing escapes it as an error.

use super::navigator::{NoveltyInfo, TopicNavigator};
use super::query_parser::{DirectionPolicy, QueryParser, normalize};
use super::renderer::{AnswerRenderer, IDK};
use crate::Result;
use crate::config::DocentConfig;
use crate::models::{FeatureId, SayBuffer};
use crate::responder::{NoPreprocessor, PatternResponder, Preprocessed, Preprocessor};
use crate::storage::FeatureStore;
use std::fmt;

/// Reply when no topic can be found in the input.
pub const DONT_UNDERSTAND: &str = "I'm sorry, but I don't understand what you are asking.";

/// Reply when "tell me more" runs past the end of the say-buffer.
pub const SAID_ALL: &str = "I've said all I can about that topic!";

/// Outcome of one branch of the turn state machine.
struct Served {
    line: String,
    topic: FeatureId,
    novelty: Option<NoveltyInfo>,
    branch: &'static str,
}

/// One conversation over a feature store.
///
/// # Example
///
/// ```rust
/// use docent::services::DialogueSession;
/// use docent::storage::FeatureGraph;
///
/// let graph = FeatureGraph::builder()
///     .feature("Museum", ["The museum opened in 1902.", "It has three floors."])
///     .build()
///     .unwrap();
/// let mut session = DialogueSession::new(graph);
///
/// let reply = session.respond("Tell me about the museum", false);
/// assert!(reply.starts_with("The museum opened in 1902."));
///
/// let reply = session.respond("tell me more", true);
/// assert_eq!(reply, "ID:0:Speak:It has three floors.:[novelty 0.10]");
/// ```
pub struct DialogueSession<S: FeatureStore> {
    store: S,
    parser: QueryParser,
    navigator: TopicNavigator,
    preprocessor: Box<dyn Preprocessor>,
    topic: Option<FeatureId>,
    buffer: SayBuffer,
    turn: u32,
}

impl<S: FeatureStore> DialogueSession<S> {
    /// Starts a conversation with default settings and no canned responses.
    #[must_use]
    pub fn new(store: S) -> Self {
        let parser = QueryParser::new(&store, DirectionPolicy::default());
        Self {
            store,
            parser,
            navigator: TopicNavigator::default(),
            preprocessor: Box::new(NoPreprocessor),
            topic: None,
            buffer: SayBuffer::default(),
            turn: 1,
        }
    }

    /// Starts a conversation configured from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a canned-response pattern fails to compile.
    pub fn from_config(store: S, config: &DocentConfig) -> Result<Self> {
        let responder = PatternResponder::from_settings(&config.responses)?;
        let session = Self::new(store)
            .with_novelty_amount(config.novelty_amount)
            .with_direction_policy(config.direction_policy);
        Ok(if responder.is_empty() {
            session
        } else {
            session.with_preprocessor(responder)
        })
    }

    /// Sets the novelty amount. Discards recency history.
    #[must_use]
    pub fn with_novelty_amount(mut self, amount: usize) -> Self {
        self.navigator = TopicNavigator::new(amount);
        self
    }

    /// Sets how overlapping direction words are resolved.
    #[must_use]
    pub fn with_direction_policy(mut self, policy: DirectionPolicy) -> Self {
        self.parser = QueryParser::new(&self.store, policy);
        self
    }

    /// Installs a canned-response layer.
    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: impl Preprocessor + 'static) -> Self {
        self.preprocessor = Box::new(preprocessor);
        self
    }

    /// Current turn number, starting at 1.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Active topic, or `None` before the first turn.
    #[must_use]
    pub const fn topic(&self) -> Option<FeatureId> {
        self.topic
    }

    /// The say-buffer being paginated.
    #[must_use]
    pub const fn buffer(&self) -> &SayBuffer {
        &self.buffer
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The topic navigator.
    #[must_use]
    pub const fn navigator(&self) -> &TopicNavigator {
        &self.navigator
    }

    /// Ends the conversation and returns the store with updated counts.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Consumes one utterance and returns the reply.
    ///
    /// Empty input moves on to the freshest next topic, "tell me more"
    /// continues the current say-buffer, and anything else is parsed as a
    /// query. In machine-readable mode the reply is
    /// `ID:<index>:Speak:<line>:<annotation>`.
    pub fn respond(&mut self, utterance: &str, machine_readable: bool) -> String {
        let utterance = utterance.trim();
        let mut input = utterance.to_string();
        if !utterance.is_empty() {
            match self.preprocessor.preprocess(utterance) {
                Some(Preprocessed::Reply(reply)) => {
                    tracing::debug!(turn = self.turn, branch = "canned", "Canned reply");
                    self.preprocessor.remember(utterance, &reply);
                    return reply;
                },
                Some(Preprocessed::Directive(payload)) => input = payload,
                None => {},
            }
        }

        let normalized = normalize(&input);
        let current = *self.topic.get_or_insert_with(|| self.store.root());
        let turn = self.turn;

        let served = if normalized.is_empty() {
            self.move_on(current, turn)
        } else if normalized.contains("tell") && normalized.contains("more") {
            self.continue_topic(current, turn)
        } else {
            self.answer(&normalized, current, turn)
        };

        self.turn = self.turn.saturating_add(1);
        tracing::debug!(
            turn,
            branch = served.branch,
            topic = %served.topic,
            cursor = self.buffer.cursor(),
            "Served turn"
        );

        let reply = format_reply(served, machine_readable);
        self.preprocessor.remember(utterance, &reply);
        reply
    }

    /// Empty input: pick a fresh topic and start on it.
    fn move_on(&mut self, current: FeatureId, turn: u32) -> Served {
        let next = self.navigator.next_topic(&self.store, current, turn);
        let novelty = self.navigator.novelty(&self.store, next, turn);
        let lines = AnswerRenderer::new(&self.store).say_about(next);
        self.start_topic(next, lines, turn, novelty, "move_on")
    }

    /// "Tell me more": serve the next buffered line about the current topic.
    fn continue_topic(&mut self, current: FeatureId, turn: u32) -> Served {
        let novelty = self.navigator.novelty(&self.store, current, turn);
        self.mark_discussed(current, turn);
        let line = self
            .buffer
            .next_line()
            .map_or_else(|| SAID_ALL.to_string(), str::to_string);
        Served {
            line,
            topic: current,
            novelty: Some(novelty),
            branch: "tell_more",
        }
    }

    /// Anything else: parse, render, and start on the resolved topic.
    fn answer(&mut self, normalized: &str, current: FeatureId, turn: u32) -> Served {
        let Some(query) = self.parser.build_query(normalized) else {
            return Served {
                line: DONT_UNDERSTAND.to_string(),
                topic: current,
                novelty: None,
                branch: "not_understood",
            };
        };
        let topic = query.topic();
        let novelty = self.navigator.novelty(&self.store, topic, turn);
        let lines = AnswerRenderer::new(&self.store).render(&query);
        self.start_topic(topic, lines, turn, novelty, "query")
    }

    fn start_topic(
        &mut self,
        topic: FeatureId,
        lines: Vec<String>,
        turn: u32,
        novelty: NoveltyInfo,
        branch: &'static str,
    ) -> Served {
        self.mark_discussed(topic, turn);
        self.topic = Some(topic);
        self.buffer = SayBuffer::new(lines);
        let line = self.buffer.next_line().unwrap_or_default().to_string();
        Served {
            line,
            topic,
            novelty: Some(novelty),
            branch,
        }
    }

    /// Bumps the topic's discussion count and records the turn.
    fn mark_discussed(&mut self, topic: FeatureId, turn: u32) {
        let amount = self
            .store
            .feature(topic)
            .map_or(0, |f| f.discussed_amount)
            .saturating_add(1);
        if let Err(e) = self.store.set_discussed_amount(topic, amount) {
            tracing::warn!(topic = %topic, error = %e, "Failed to persist discussion count");
        }
        self.navigator.record(topic, turn);
    }
}

fn format_reply(served: Served, machine_readable: bool) -> String {
    if served.line.is_empty() {
        return IDK.to_string();
    }
    let annotation = served
        .novelty
        .map(|novelty| novelty.to_string())
        .unwrap_or_default();
    if machine_readable {
        format!(
            "ID:{}:Speak:{}:{annotation}",
            served.topic.index(),
            served.line
        )
    } else if annotation.is_empty() {
        served.line
    } else {
        format!("{} {annotation}", served.line)
    }
}

impl<S: FeatureStore + fmt::Debug> fmt::Debug for DialogueSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogueSession")
            .field("store", &self.store)
            .field("navigator", &self.navigator)
            .field("topic", &self.topic)
            .field("buffer", &self.buffer)
            .field("turn", &self.turn)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::ResponseRule;
    use crate::storage::FeatureGraph;

    fn museum() -> FeatureGraph {
        FeatureGraph::builder()
            .feature("Museum", ["Line 0", "Line 1", "Line 2", "Line 3"])
            .feature("Park", ["The park is green."])
            .feature("Cafe", ["The cafe sells tea."])
            .edge("Park", "Museum", "south")
            .build()
            .unwrap()
    }

    fn discussed(session: &DialogueSession<FeatureGraph>, name: &str) -> u32 {
        let id = session.store().find(name).unwrap();
        session.store().feature(id).unwrap().discussed_amount
    }

    #[test]
    fn test_query_installs_buffer_and_serves_first_line() {
        let mut session = DialogueSession::new(museum());
        let reply = session.respond("Tell me about the museum", false);
        assert_eq!(reply, "Line 0 [novelty 1.00 | related: Park, Cafe]");
        assert_eq!(session.topic(), Some(FeatureId::new(0)));
        assert_eq!(session.buffer().cursor(), 1);
        assert_eq!(session.turn(), 2);
        assert_eq!(discussed(&session, "Museum"), 1);
    }

    #[test]
    fn test_tell_me_more_paginates_then_stops() {
        let mut session = DialogueSession::new(museum());
        session.respond("the museum", false);

        assert!(session.respond("tell me more", false).starts_with("Line 1 "));
        assert!(session.respond("Tell me more!", false).starts_with("Line 2 "));
        assert!(session.respond("tell me more", false).starts_with("Line 3 "));
        assert!(session.respond("tell me more", false).starts_with(SAID_ALL));
        assert_eq!(session.buffer().cursor(), 4);
        assert_eq!(discussed(&session, "Museum"), 5);
    }

    #[test]
    fn test_parser_failure_keeps_topic_and_buffer() {
        let mut session = DialogueSession::new(museum());
        session.respond("the museum", false);
        let buffer = session.buffer().clone();

        let reply = session.respond("what about berlin", false);
        assert_eq!(reply, DONT_UNDERSTAND);
        assert_eq!(session.topic(), Some(FeatureId::new(0)));
        assert_eq!(session.buffer(), &buffer);
        assert_eq!(session.turn(), 3);
    }

    #[test]
    fn test_empty_input_moves_to_fresh_neighbor() {
        let mut session = DialogueSession::new(museum());
        let reply = session.respond("", false);
        assert!(reply.starts_with("The park is green."));
        assert_eq!(session.topic(), Some(FeatureId::new(1)));
        assert_eq!(discussed(&session, "Park"), 1);
        assert_eq!(session.turn(), 2);
        assert_eq!(session.buffer().cursor(), 1);
    }

    #[test]
    fn test_machine_readable_reply() {
        let mut session = DialogueSession::new(museum()).with_novelty_amount(1);
        let reply = session.respond("the cafe", true);
        assert_eq!(reply, "ID:2:Speak:The cafe sells tea.:[novelty 1.00 | related: Museum]");
    }

    #[test]
    fn test_empty_render_uses_sentinel() {
        let mut session = DialogueSession::new(museum());
        let reply = session.respond("when was the museum built", false);
        assert!(reply.starts_with(IDK));
    }

    #[test]
    fn test_canned_reply_bypasses_pipeline() {
        let responder = PatternResponder::new(vec![
            ResponseRule::new("^hello", "Hello! Ask me about a place.", None).unwrap(),
        ]);
        let mut session = DialogueSession::new(museum()).with_preprocessor(responder);
        assert_eq!(session.respond("hello", false), "Hello! Ask me about a place.");
        assert_eq!(session.topic(), None);
        assert_eq!(session.turn(), 1);
    }

    #[test]
    fn test_canned_rules_see_trimmed_utterance() {
        let responder = PatternResponder::new(vec![
            ResponseRule::new("^hello$", "Hello! Ask me about a place.", None).unwrap(),
        ]);
        let mut session = DialogueSession::new(museum()).with_preprocessor(responder);
        assert_eq!(session.respond("  hello  ", false), "Hello! Ask me about a place.");
        assert_eq!(session.turn(), 1);
    }

    #[test]
    fn test_topic_inside_question_word() {
        let graph = FeatureGraph::builder()
            .feature("Hat", ["A hat shop."])
            .feature("Hall", Vec::<String>::new())
            .edge("Hat", "Hall", "north")
            .build()
            .unwrap();
        let mut session = DialogueSession::new(graph);
        let reply = session.respond("what is north of the hat", false);
        assert!(reply.starts_with("North of Hat is Hall."), "{reply}");
    }

    #[test]
    fn test_hostel_is_not_a_hosting_question() {
        let graph = FeatureGraph::builder()
            .feature("Park", Vec::<String>::new())
            .feature("Lake", Vec::<String>::new())
            .edge("Park", "Lake", "north")
            .build()
            .unwrap();
        let mut session = DialogueSession::new(graph);
        let reply = session.respond("where is the hostel by the park", false);
        assert!(reply.starts_with("Park is south of Lake."), "{reply}");
    }

    #[test]
    fn test_canned_directive_is_parsed() {
        let responder = PatternResponder::new(vec![
            ResponseRule::new("^show me (.+)$", "FORMAT: what is south of $1", None).unwrap(),
        ]);
        let mut session = DialogueSession::new(museum()).with_preprocessor(responder);
        let reply = session.respond("show me the Park", false);
        assert!(reply.starts_with("South of Park is Museum."));
    }
}
