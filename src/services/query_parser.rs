//! Rule-based utterance parser.
//!
//! Turns free text into a [`Query`]:
//! - the main topic is the longest known topic name found in the input
//! - the question kind comes from an ordered decision list
//!   (`where`, then `when`, then `what` or `?`)
//! - a WHAT question may name a relation through a direction word
//!
//! Parsing is plain word and substring matching on normalized text; there
//! is no grammar.

use crate::models::{DIRECTION_ALIASES, DIRECTION_WORDS, Direction, FeatureId, Query, Question};
use crate::storage::FeatureStore;
use serde::Deserialize;

/// Punctuation padded by [`normalize`] and removed by [`strip`].
pub const PUNCTUATION: &[char] = &[',', ';', '.', '?', '!', '\'', '"', '(', ')', '-'];

/// How the direction-word scan settles multiple matches.
///
/// "north" is a substring of "northeast", so a question about the northeast
/// matches both words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionPolicy {
    /// The longest matching word wins; ties go to the later table entry.
    #[default]
    LongestMatch,
    /// Every match overwrites the previous one, so the last table entry wins.
    LastMatch,
}

impl DirectionPolicy {
    /// Parses a policy name. Unknown names fall back to the default.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "last_match" | "last" | "legacy" => Self::LastMatch,
            _ => Self::LongestMatch,
        }
    }
}

/// Trims, lowercases, and pads punctuation with spaces.
///
/// Padding keeps punctuation from fusing with words during substring
/// search. Whitespace runs are collapsed to single spaces.
///
/// # Examples
///
/// ```
/// use docent::services::normalize;
///
/// assert_eq!(normalize("  Where's the Park?"), "where ' s the park ?");
/// ```
#[must_use]
pub fn normalize(input: &str) -> String {
    let mut padded = String::with_capacity(input.len() + 8);
    for c in input.trim().chars() {
        if PUNCTUATION.contains(&c) {
            padded.push(' ');
            padded.push(c);
            padded.push(' ');
        } else {
            padded.extend(c.to_lowercase());
        }
    }
    collapse_whitespace(&padded)
}

/// Lowercases, removes punctuation, and collapses whitespace.
///
/// Used when matching topic names, so punctuation embedded in a name
/// ("St. Louis") does not break the match.
#[must_use]
pub fn strip(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .flat_map(char::to_lowercase)
        .collect();
    collapse_whitespace(&cleaned)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn has_word(input: &str, word: &str) -> bool {
    input.split_whitespace().any(|w| w == word)
}

/// Classifies normalized input into a question kind and optional direction.
///
/// First matching rule wins:
/// 1. contains "where": WHERE, with `WasHostedAt` if "host" or "hosted" is a
///    word of the input
/// 2. contains "when": WHEN
/// 3. contains "what" or "?": WHAT, with a direction from the word scan
/// 4. otherwise a plain statement
#[must_use]
pub fn classify(input: &str, policy: DirectionPolicy) -> (Option<Question>, Option<Direction>) {
    if input.contains("where") {
        let hosting = input.contains("was_hosted_at")
            || has_word(input, "host")
            || has_word(input, "hosted");
        let direction = hosting.then_some(Direction::WasHostedAt);
        (Some(Question::Where), direction)
    } else if input.contains("when") {
        (Some(Question::When), None)
    } else if input.contains("what") || input.contains('?') {
        (Some(Question::What), scan_direction(input, policy))
    } else {
        (None, None)
    }
}

/// Scans [`DIRECTION_WORDS`] for substrings of the input, then
/// [`DIRECTION_ALIASES`] for whole words.
#[must_use]
pub fn scan_direction(input: &str, policy: DirectionPolicy) -> Option<Direction> {
    let compass = DIRECTION_WORDS
        .iter()
        .filter(|(word, _)| input.contains(word));
    let verbs = DIRECTION_ALIASES
        .iter()
        .filter(|(word, _)| has_word(input, word));

    let mut found: Option<(&str, Direction)> = None;
    for &(word, direction) in compass.chain(verbs) {
        let replace = match (policy, found) {
            (DirectionPolicy::LastMatch, _) | (_, None) => true,
            (DirectionPolicy::LongestMatch, Some((best, _))) => word.len() >= best.len(),
        };
        if replace {
            found = Some((word, direction));
        }
    }
    found.map(|(_, direction)| direction)
}

/// Parser bound to the topic names of one graph.
#[derive(Debug, Clone)]
pub struct QueryParser {
    /// Topic IDs with their stripped, lowercased names, in graph order.
    topics: Vec<(FeatureId, String)>,
    policy: DirectionPolicy,
}

impl QueryParser {
    /// Creates a parser over every topic in the store.
    #[must_use]
    pub fn new<S: FeatureStore + ?Sized>(store: &S, policy: DirectionPolicy) -> Self {
        let topics = store
            .ids()
            .into_iter()
            .filter_map(|id| store.feature(id).map(|f| (id, strip(&f.name))))
            .filter(|(_, name)| !name.is_empty())
            .collect();
        Self { topics, policy }
    }

    /// The direction policy in use.
    #[must_use]
    pub const fn policy(&self) -> DirectionPolicy {
        self.policy
    }

    /// Finds the topic with the longest name contained in the input.
    ///
    /// Ties keep the first topic in graph order. Returns `None` if no topic
    /// name occurs in the input.
    #[must_use]
    pub fn find_topic(&self, input: &str) -> Option<FeatureId> {
        self.find_topic_match(input).map(|(id, _)| id)
    }

    fn find_topic_match(&self, input: &str) -> Option<(FeatureId, &str)> {
        let haystack = strip(input);
        let mut best: Option<(FeatureId, &str, usize)> = None;
        for (id, name) in &self.topics {
            if !haystack.contains(name.as_str()) {
                continue;
            }
            let len = name.chars().count();
            if best.is_none_or(|(_, _, best_len)| len > best_len) {
                best = Some((*id, name.as_str(), len));
            }
        }
        best.map(|(id, name, _)| (id, name))
    }

    /// Classifies input with this parser's direction policy.
    #[must_use]
    pub fn classify(&self, input: &str) -> (Option<Question>, Option<Direction>) {
        classify(input, self.policy)
    }

    /// Builds a query from normalized input.
    ///
    /// The matched topic name is removed before classification, so a topic
    /// such as "North Park" does not read as a direction. Returns `None` if
    /// no topic can be found.
    #[must_use]
    pub fn build_query(&self, input: &str) -> Option<Query> {
        let Some((topic, name)) = self.find_topic_match(input) else {
            tracing::debug!(input, "No topic found in input");
            return None;
        };
        let remainder = remove_topic_words(input, name);
        let (question, direction) = self.classify(&remainder);
        let query = Query::new(topic, question, direction);
        tracing::debug!(%query, "Built query");
        Some(query)
    }
}

/// Removes the first whole-word occurrence of a stripped topic name.
///
/// Words are compared with punctuation removed, and punctuation tokens
/// inside the occurrence ("st . louis") go with it. Input without a
/// whole-word occurrence is returned unchanged.
fn remove_topic_words(input: &str, name: &str) -> String {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let words: Vec<(usize, String)> = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| (i, strip(token)))
        .filter(|(_, word)| !word.is_empty())
        .collect();
    let name_words: Vec<&str> = name.split(' ').collect();
    if name_words.is_empty() || words.len() < name_words.len() {
        return input.to_string();
    }

    let occurrence = words.windows(name_words.len()).find(|window| {
        window
            .iter()
            .zip(&name_words)
            .all(|((_, word), name_word)| word == name_word)
    });
    let Some(window) = occurrence else {
        return input.to_string();
    };
    let (first, last) = (window[0].0, window[window.len() - 1].0);
    tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| *i < first || *i > last)
        .map(|(_, token)| *token)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FeatureGraph;
    use test_case::test_case;

    fn graph(names: &[&str]) -> FeatureGraph {
        names
            .iter()
            .fold(FeatureGraph::builder(), |b, name| {
                b.feature(*name, Vec::<String>::new())
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_normalize_pads_punctuation() {
        assert_eq!(normalize("Hello,World!"), "hello , world !");
        assert_eq!(normalize("  what's   up?  "), "what ' s up ?");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_strip_removes_punctuation() {
        assert_eq!(strip("St. Louis (MO)"), "st louis mo");
        assert_eq!(strip("tell me about st . louis ?"), "tell me about st louis");
    }

    #[test]
    fn test_longest_match_wins() {
        let g = graph(&["Paris", "Paris Olympics"]);
        let parser = QueryParser::new(&g, DirectionPolicy::default());
        let found = parser.find_topic(&normalize("tell me about the paris olympics"));
        assert_eq!(found, Some(FeatureId::new(1)));
    }

    #[test]
    fn test_tie_keeps_first() {
        let g = graph(&["Lyon", "Nice"]);
        let parser = QueryParser::new(&g, DirectionPolicy::default());
        assert_eq!(
            parser.find_topic("from nice to lyon"),
            Some(FeatureId::new(0))
        );
    }

    #[test]
    fn test_punctuated_topic_name_matches() {
        let g = graph(&["St. Louis"]);
        let parser = QueryParser::new(&g, DirectionPolicy::default());
        assert_eq!(
            parser.find_topic(&normalize("Tell me about St. Louis.")),
            Some(FeatureId::new(0))
        );
    }

    #[test]
    fn test_no_topic_fails() {
        let g = graph(&["Paris"]);
        let parser = QueryParser::new(&g, DirectionPolicy::default());
        assert!(parser.build_query("tell me about berlin").is_none());
    }

    #[test_case("where is the park", Some(Question::Where), None)]
    #[test_case("where was it hosted at", Some(Question::Where), Some(Direction::WasHostedAt))]
    #[test_case("where was_hosted_at", Some(Question::Where), Some(Direction::WasHostedAt))]
    #[test_case("when was it built", Some(Question::When), None)]
    #[test_case("when is north", Some(Question::When), None)]
    #[test_case("what is this", Some(Question::What), None)]
    #[test_case("the park ?", Some(Question::What), None)]
    #[test_case("what is inside", Some(Question::What), Some(Direction::Inside))]
    #[test_case("what did it host", Some(Question::What), Some(Direction::Hosted))]
    #[test_case("what won", Some(Question::What), Some(Direction::Won))]
    #[test_case("what did alice win", Some(Question::What), Some(Direction::Won))]
    #[test_case("what is north of the window", Some(Question::What), Some(Direction::North))]
    #[test_case("what is a wonton", Some(Question::What), None)]
    #[test_case("where is the hostel", Some(Question::Where), None)]
    #[test_case("where was it hosted", Some(Question::Where), Some(Direction::WasHostedAt))]
    #[test_case("tell me about it", None, None)]
    fn test_classify(input: &str, question: Option<Question>, direction: Option<Direction>) {
        assert_eq!(
            classify(input, DirectionPolicy::LongestMatch),
            (question, direction)
        );
    }

    #[test]
    fn test_direction_policies_differ_on_overlapping_words() {
        let input = "what is northeast of x";
        assert_eq!(
            scan_direction(input, DirectionPolicy::LongestMatch),
            Some(Direction::Northeast)
        );
        assert_eq!(
            scan_direction(input, DirectionPolicy::LastMatch),
            Some(Direction::Northeast)
        );

        // A shorter word later in the table overrides under the legacy scan.
        let input = "what is northwest and who won";
        assert_eq!(
            scan_direction(input, DirectionPolicy::LongestMatch),
            Some(Direction::Northwest)
        );
        assert_eq!(
            scan_direction(input, DirectionPolicy::LastMatch),
            Some(Direction::Won)
        );
    }

    #[test]
    fn test_topic_name_does_not_steer_classification() {
        let g = graph(&["North Park"]);
        let parser = QueryParser::new(&g, DirectionPolicy::default());
        let query = parser.build_query("what is north park").unwrap();
        assert_eq!(query.question(), Some(Question::What));
        assert_eq!(query.direction(), None);

        let query = parser.build_query("what is south of north park").unwrap();
        assert_eq!(query.direction(), Some(Direction::South));
    }

    #[test]
    fn test_topic_inside_another_word_is_not_removed() {
        let g = graph(&["Hat"]);
        let parser = QueryParser::new(&g, DirectionPolicy::default());
        let query = parser.build_query("what is north of the hat").unwrap();
        assert_eq!(query.topic(), FeatureId::new(0));
        assert_eq!(query.question(), Some(Question::What));
        assert_eq!(query.direction(), Some(Direction::North));
    }

    #[test]
    fn test_punctuated_topic_removed_before_classification() {
        let g = graph(&["North St."]);
        let parser = QueryParser::new(&g, DirectionPolicy::default());

        let query = parser.build_query(&normalize("What is south of North St.?")).unwrap();
        assert_eq!(query.direction(), Some(Direction::South));

        let query = parser.build_query(&normalize("What is North St.?")).unwrap();
        assert_eq!(query.question(), Some(Question::What));
        assert_eq!(query.direction(), None);
    }

    #[test]
    fn test_remove_topic_words() {
        assert_eq!(remove_topic_words("what is north of the hat", "hat"), "what is north of the");
        assert_eq!(remove_topic_words("tell me about st . louis ?", "st louis"), "tell me about ?");
        assert_eq!(remove_topic_words("that hat", "at"), "that hat");
    }

    #[test]
    fn test_build_query_statement() {
        let g = graph(&["Museum"]);
        let parser = QueryParser::new(&g, DirectionPolicy::default());
        let query = parser.build_query("tell me about the museum").unwrap();
        assert_eq!(query, Query::statement(FeatureId::new(0)));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(DirectionPolicy::parse("last-match"), DirectionPolicy::LastMatch);
        assert_eq!(DirectionPolicy::parse("LEGACY"), DirectionPolicy::LastMatch);
        assert_eq!(DirectionPolicy::parse("longest_match"), DirectionPolicy::LongestMatch);
        assert_eq!(DirectionPolicy::parse("???"), DirectionPolicy::LongestMatch);
    }
}
