//! Directional and relational labels between topics.
//!
//! Each [`Direction`] carries a signed magnitude. Paired directions share the
//! same absolute magnitude with opposite signs, so inversion is negation.
//!
//! | Pair | Magnitude |
//! |------|-----------|
//! | `North` / `South` | ±1 |
//! | `East` / `West` | ±2 |
//! | `Northeast` / `Southwest` | ±3 |
//! | `Northwest` / `Southeast` | ±4 |
//! | `Contain` / `Inside` | ±5 |
//! | `Hosted` / `WasHostedAt` | ±6 |
//! | `Won` | 0 |
//!
//! `Won` has no paired "lost" relation. It inverts to itself and winner
//! inference is handled by the renderer instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A labeled relation kind between two topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// North of.
    North,
    /// South of.
    South,
    /// East of.
    East,
    /// West of.
    West,
    /// Northeast of.
    Northeast,
    /// Southwest of.
    Southwest,
    /// Northwest of.
    Northwest,
    /// Southeast of.
    Southeast,
    /// Contains the other topic.
    Contain,
    /// Lies inside the other topic.
    Inside,
    /// Hosted the other topic (an event).
    Hosted,
    /// Was hosted at the other topic (a place).
    WasHostedAt,
    /// Won the other topic.
    Won,
}

/// Ordered direction words scanned by the query parser.
///
/// These match anywhere in the input, so "northeast" also contains "north".
/// Order matters for [`DirectionPolicy::LastMatch`](crate::services::DirectionPolicy):
/// a later entry overwrites an earlier one.
pub const DIRECTION_WORDS: &[(&str, Direction)] = &[
    ("inside", Direction::Inside),
    ("contain", Direction::Contain),
    ("north", Direction::North),
    ("east", Direction::East),
    ("west", Direction::West),
    ("south", Direction::South),
    ("northeast", Direction::Northeast),
    ("northwest", Direction::Northwest),
    ("southeast", Direction::Southeast),
    ("southwest", Direction::Southwest),
    ("was_hosted_at", Direction::WasHostedAt),
];

/// Event verbs scanned after [`DIRECTION_WORDS`].
///
/// Unlike compass words these only match whole words, so "hostel" and
/// "window" stay plain nouns.
pub const DIRECTION_ALIASES: &[(&str, Direction)] = &[
    ("host", Direction::Hosted),
    ("hosted", Direction::Hosted),
    ("win", Direction::Won),
    ("won", Direction::Won),
];

impl Direction {
    /// Returns all direction variants.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::North,
            Self::South,
            Self::East,
            Self::West,
            Self::Northeast,
            Self::Southwest,
            Self::Northwest,
            Self::Southeast,
            Self::Contain,
            Self::Inside,
            Self::Hosted,
            Self::WasHostedAt,
            Self::Won,
        ]
    }

    /// Returns the signed magnitude used to express inversion.
    #[must_use]
    pub const fn magnitude(self) -> i8 {
        match self {
            Self::North => 1,
            Self::South => -1,
            Self::East => 2,
            Self::West => -2,
            Self::Northeast => 3,
            Self::Southwest => -3,
            Self::Northwest => 4,
            Self::Southeast => -4,
            Self::Contain => 5,
            Self::Inside => -5,
            Self::Hosted => 6,
            Self::WasHostedAt => -6,
            Self::Won => 0,
        }
    }

    /// Looks up the direction with the given magnitude.
    #[must_use]
    pub fn from_magnitude(magnitude: i8) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|d| d.magnitude() == magnitude)
    }

    /// Returns the paired inverse. `Won` inverts to itself.
    #[must_use]
    pub const fn invert(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Northeast => Self::Southwest,
            Self::Southwest => Self::Northeast,
            Self::Northwest => Self::Southeast,
            Self::Southeast => Self::Northwest,
            Self::Contain => Self::Inside,
            Self::Inside => Self::Contain,
            Self::Hosted => Self::WasHostedAt,
            Self::WasHostedAt => Self::Hosted,
            Self::Won => Self::Won,
        }
    }

    /// Returns the relation key: lowercase, words joined by underscores.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Northeast => "northeast",
            Self::Southwest => "southwest",
            Self::Northwest => "northwest",
            Self::Southeast => "southeast",
            Self::Contain => "contain",
            Self::Inside => "inside",
            Self::Hosted => "hosted",
            Self::WasHostedAt => "was_hosted_at",
            Self::Won => "won",
        }
    }

    /// Returns the spoken form, with spaces between words.
    #[must_use]
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Returns the spoken form with its first letter uppercased.
    #[must_use]
    pub fn title(self) -> String {
        let label = self.label();
        let mut chars = label.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }

    /// Maps a free-text relation label to a direction.
    ///
    /// Matching ignores case and treats spaces and underscores alike, so
    /// `"Was hosted at"` maps to [`Direction::WasHostedAt`]. Unknown labels
    /// return `None`.
    #[must_use]
    pub fn from_relation(label: &str) -> Option<Self> {
        let key = relation_key(label);
        Self::all().iter().copied().find(|d| d.as_str() == key)
    }
}

/// Normalizes a relation label for comparison.
///
/// Lowercases, trims, and joins words with underscores.
#[must_use]
pub fn relation_key(label: &str) -> String {
    label
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_relation(s).ok_or_else(|| format!("unknown direction: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_invert_is_involution() {
        for &d in Direction::all() {
            assert_eq!(d.invert().invert(), d, "{d}");
        }
    }

    #[test]
    fn test_won_is_self_inverse() {
        assert_eq!(Direction::Won.invert(), Direction::Won);
        assert_eq!(Direction::Won.magnitude(), 0);
    }

    #[test]
    fn test_invert_negates_magnitude() {
        for &d in Direction::all() {
            assert_eq!(d.invert().magnitude(), -d.magnitude());
            assert_eq!(Direction::from_magnitude(-d.magnitude()), Some(d.invert()));
        }
    }

    #[test_case("north", Some(Direction::North))]
    #[test_case("North", Some(Direction::North))]
    #[test_case("was hosted at", Some(Direction::WasHostedAt))]
    #[test_case("WAS_HOSTED_AT", Some(Direction::WasHostedAt))]
    #[test_case(" won ", Some(Direction::Won))]
    #[test_case("next to", None)]
    #[test_case("", None)]
    fn test_from_relation(label: &str, expected: Option<Direction>) {
        assert_eq!(Direction::from_relation(label), expected);
    }

    #[test]
    fn test_direction_words_cover_every_direction() {
        for &d in Direction::all() {
            assert!(
                DIRECTION_WORDS
                    .iter()
                    .chain(DIRECTION_ALIASES)
                    .any(|&(_, w)| w == d),
                "{d} has no direction word"
            );
        }
    }

    #[test]
    fn test_title_and_label() {
        assert_eq!(Direction::Northeast.title(), "Northeast");
        assert_eq!(Direction::WasHostedAt.label(), "was hosted at");
        assert_eq!(Direction::WasHostedAt.title(), "Was hosted at");
    }
}
