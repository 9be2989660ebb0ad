//! Answer rendering.
//!
//! Turns a [`Query`] into the ordered sentences of a say-buffer.
//!
//! Edge convention: for compass and containment relations, an edge
//! `A --d--> B` means "B is d of A". Asking WHAT is d of A therefore reads
//! "D of A is B", and asking WHERE A is reads "A is inverse(d) of B".
//! Verb relations read left to right: `A --hosted--> B` is "A hosted B".

use crate::models::{Direction, FeatureId, Query, Question};
use crate::storage::FeatureStore;

/// Spoken when nothing can be said about a topic.
pub const IDK: &str = "I'm afraid I don't know anything about that topic.";

/// Joins items as an English list: "A", "A and B", "A, B, and C".
///
/// # Examples
///
/// ```
/// use docent::services::join_and;
///
/// assert_eq!(join_and(&["A", "B", "C"]), "A, B, and C");
/// ```
#[must_use]
pub fn join_and<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        },
    }
}

/// Renders queries against a feature store.
#[derive(Debug, Clone, Copy)]
pub struct AnswerRenderer<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: FeatureStore + ?Sized> AnswerRenderer<'a, S> {
    /// Creates a renderer over a store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Renders a query into a say-buffer. Never empty: falls back to [`IDK`].
    #[must_use]
    pub fn render(&self, query: &Query) -> Vec<String> {
        let topic = query.topic();
        let output = match (query.question(), query.direction()) {
            (None, _) | (Some(Question::What), None) => self.say_about(topic),
            (Some(Question::What), Some(Direction::Won)) => self.winners(topic),
            (Some(Question::What), Some(Direction::Hosted)) => {
                let hosted = self.neighbor_names(topic, Direction::Hosted.as_str());
                if hosted.is_empty() {
                    Vec::new()
                } else {
                    vec![format!("{} hosted {}.", self.name(topic), join_and(&hosted))]
                }
            },
            (Some(Question::What), Some(direction)) => {
                let found = self.neighbor_names(topic, direction.as_str());
                if found.is_empty() {
                    Vec::new()
                } else {
                    let verb = if found.len() == 1 { "is" } else { "are" };
                    vec![format!(
                        "{} of {} {verb} {}.",
                        direction.title(),
                        self.name(topic),
                        join_and(&found)
                    )]
                }
            },
            (Some(Question::Where), Some(Direction::WasHostedAt)) => self
                .neighbor_names(topic, Direction::WasHostedAt.as_str())
                .into_iter()
                .map(|host| format!("{} was hosted at {host}.", self.name(topic)))
                .collect(),
            (Some(Question::Where), _) => self.neighbor_relations(topic),
            // Nothing records dates yet.
            (Some(Question::When), _) => Vec::new(),
        };

        if output.is_empty() {
            vec![IDK.to_string()]
        } else {
            output
        }
    }

    /// Everything there is to say about a topic: its own lines, then where
    /// it lies relative to each directional neighbor. Falls back to the bare
    /// topic name.
    #[must_use]
    pub fn say_about(&self, topic: FeatureId) -> Vec<String> {
        let mut lines = self
            .store
            .feature(topic)
            .map(|f| f.speaks.clone())
            .unwrap_or_default();
        lines.extend(self.neighbor_relations(topic));
        if lines.is_empty() {
            lines.push(self.name(topic).to_string());
        }
        lines
    }

    /// One sentence per directional neighbor, from the topic's vantage. The
    /// first names the topic; the rest use "It".
    #[must_use]
    pub fn neighbor_relations(&self, topic: FeatureId) -> Vec<String> {
        let Some(feature) = self.store.feature(topic) else {
            return Vec::new();
        };
        feature
            .directional_neighbors()
            .enumerate()
            .map(|(i, (neighbor, direction))| {
                let subject = if i == 0 { feature.name.as_str() } else { "It" };
                format!(
                    "{subject} is {} of {}.",
                    direction.invert().label(),
                    self.name(neighbor)
                )
            })
            .collect()
    }

    /// WON inference. A topic with outgoing "won" edges is the winner;
    /// otherwise it is the prize, and each feature holding a "won" edge to
    /// it is reported. Neighbors are checked first; the whole graph only when
    /// no neighbor has one, since the prize need not link back.
    fn winners(&self, topic: FeatureId) -> Vec<String> {
        let relation = Direction::Won.as_str();
        let won = self.neighbor_names(topic, relation);
        if !won.is_empty() {
            return vec![format!("{} won {}.", self.name(topic), join_and(&won))];
        }

        let Some(feature) = self.store.feature(topic) else {
            return Vec::new();
        };
        let output = self.won_by(topic, feature.distinct_neighbors(Some(topic)));
        if !output.is_empty() {
            return output;
        }
        let others = self.store.ids().into_iter().filter(|&id| id != topic);
        self.won_by(topic, others)
    }

    /// "N won T." for each candidate N with a "won" edge to the topic.
    fn won_by(
        &self,
        topic: FeatureId,
        candidates: impl IntoIterator<Item = FeatureId>,
    ) -> Vec<String> {
        let relation = Direction::Won.as_str();
        let prize = self.name(topic);
        let mut output = Vec::new();
        for candidate in candidates {
            let Some(winner) = self.store.feature(candidate) else {
                continue;
            };
            for edge in &winner.neighbors {
                if edge.target == topic && edge.is_relation(relation) {
                    output.push(format!("{} won {prize}.", winner.name));
                }
            }
        }
        output
    }

    fn neighbor_names(&self, topic: FeatureId, relation: &str) -> Vec<&'a str> {
        let store = self.store;
        store.feature(topic).map_or_else(Vec::new, |f| {
            f.neighbors_by_relation(relation)
                .map(|id| store.name_of(id))
                .collect()
        })
    }

    fn name(&self, id: FeatureId) -> &'a str {
        self.store.name_of(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FeatureGraph;

    fn olympics() -> FeatureGraph {
        FeatureGraph::builder()
            .feature("City", ["The city sits on a river."])
            .feature("Olympics", Vec::<String>::new())
            .feature("Games", Vec::<String>::new())
            .feature("Alice", Vec::<String>::new())
            .feature("Bob", Vec::<String>::new())
            .feature("Tower", Vec::<String>::new())
            .edge("City", "Olympics", "hosted")
            .edge("Olympics", "City", "was hosted at")
            .edge("Games", "Alice", "won")
            .edge("Alice", "Games", "competed in")
            .edge("City", "Tower", "north")
            .build()
            .unwrap()
    }

    fn id(graph: &FeatureGraph, name: &str) -> FeatureId {
        graph.find(name).unwrap()
    }

    #[test]
    fn test_join_and() {
        let empty: [&str; 0] = [];
        assert_eq!(join_and(&empty), "");
        assert_eq!(join_and(&["A"]), "A");
        assert_eq!(join_and(&["A", "B"]), "A and B");
        assert_eq!(join_and(&["A", "B", "C"]), "A, B, and C");
        assert_eq!(join_and(&["A", "B", "C", "D"]), "A, B, C, and D");
    }

    #[test]
    fn test_say_about_speaks_then_relations() {
        let graph = olympics();
        let renderer = AnswerRenderer::new(&graph);
        assert_eq!(
            renderer.say_about(id(&graph, "City")),
            vec![
                "The city sits on a river.".to_string(),
                "City is was hosted at of Olympics.".to_string(),
                "It is south of Tower.".to_string(),
            ]
        );
    }

    #[test]
    fn test_say_about_falls_back_to_name() {
        let graph = olympics();
        let renderer = AnswerRenderer::new(&graph);
        assert_eq!(renderer.say_about(id(&graph, "Bob")), vec!["Bob".to_string()]);
    }

    #[test]
    fn test_won_direct() {
        let graph = olympics();
        let renderer = AnswerRenderer::new(&graph);
        let query = Query::new(id(&graph, "Games"), Some(Question::What), Some(Direction::Won));
        assert_eq!(renderer.render(&query), vec!["Games won Alice.".to_string()]);
    }

    #[test]
    fn test_won_two_hop() {
        let graph = olympics();
        let renderer = AnswerRenderer::new(&graph);
        let query = Query::new(id(&graph, "Alice"), Some(Question::What), Some(Direction::Won));
        assert_eq!(renderer.render(&query), vec!["Games won Alice.".to_string()]);
    }

    #[test]
    fn test_won_without_back_edge() {
        let graph = FeatureGraph::builder()
            .feature("Games", Vec::<String>::new())
            .feature("Alice", Vec::<String>::new())
            .feature("Bob", Vec::<String>::new())
            .edge("Games", "Alice", "won")
            .build()
            .unwrap();
        let renderer = AnswerRenderer::new(&graph);
        let query = Query::new(id(&graph, "Alice"), Some(Question::What), Some(Direction::Won));
        assert_eq!(renderer.render(&query), vec!["Games won Alice.".to_string()]);

        let query = Query::new(id(&graph, "Bob"), Some(Question::What), Some(Direction::Won));
        assert_eq!(renderer.render(&query), vec![IDK.to_string()]);
    }

    #[test]
    fn test_hosted() {
        let graph = olympics();
        let renderer = AnswerRenderer::new(&graph);
        let query = Query::new(id(&graph, "City"), Some(Question::What), Some(Direction::Hosted));
        assert_eq!(renderer.render(&query), vec!["City hosted Olympics.".to_string()]);
    }

    #[test]
    fn test_hosted_none_falls_back() {
        let graph = olympics();
        let renderer = AnswerRenderer::new(&graph);
        let query = Query::new(id(&graph, "Bob"), Some(Question::What), Some(Direction::Hosted));
        assert_eq!(renderer.render(&query), vec![IDK.to_string()]);
    }

    #[test]
    fn test_where_was_hosted_at() {
        let graph = olympics();
        let renderer = AnswerRenderer::new(&graph);
        let query = Query::new(
            id(&graph, "Olympics"),
            Some(Question::Where),
            Some(Direction::WasHostedAt),
        );
        assert_eq!(
            renderer.render(&query),
            vec!["Olympics was hosted at City.".to_string()]
        );
    }

    #[test]
    fn test_what_direction_singular_and_plural() {
        let graph = FeatureGraph::builder()
            .feature("Square", Vec::<String>::new())
            .feature("Bank", Vec::<String>::new())
            .feature("Cafe", Vec::<String>::new())
            .feature("Shop", Vec::<String>::new())
            .edge("Square", "Bank", "north")
            .edge("Square", "Cafe", "east")
            .edge("Square", "Shop", "East")
            .build()
            .unwrap();
        let renderer = AnswerRenderer::new(&graph);
        let square = id(&graph, "Square");

        let north = Query::new(square, Some(Question::What), Some(Direction::North));
        assert_eq!(renderer.render(&north), vec!["North of Square is Bank.".to_string()]);

        let east = Query::new(square, Some(Question::What), Some(Direction::East));
        assert_eq!(
            renderer.render(&east),
            vec!["East of Square are Cafe and Shop.".to_string()]
        );
    }

    #[test]
    fn test_where_uses_inverse_direction() {
        let graph = olympics();
        let renderer = AnswerRenderer::new(&graph);
        let query = Query::new(id(&graph, "Tower"), Some(Question::Where), None);
        // Tower has no outgoing edges of its own.
        assert_eq!(renderer.render(&query), vec![IDK.to_string()]);

        let query = Query::new(id(&graph, "City"), Some(Question::Where), None);
        let lines = renderer.render(&query);
        assert_eq!(lines[1], "It is south of Tower.");
    }

    #[test]
    fn test_when_renders_nothing() {
        let graph = olympics();
        let renderer = AnswerRenderer::new(&graph);
        let query = Query::new(id(&graph, "City"), Some(Question::When), None);
        assert_eq!(renderer.render(&query), vec![IDK.to_string()]);
    }
}
