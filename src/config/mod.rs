//! Configuration management.
//!
//! Settings come from a TOML file, then environment overrides:
//!
//! ```toml
//! graph_path = "museum.json"
//! novelty_amount = 5
//! direction_policy = "longest_match"   # or "last_match"
//!
//! [logging]
//! format = "pretty"                     # or "json"
//! level = "info"
//! file = "docent.log"
//!
//! [[responses]]
//! pattern = "^(hi|hello)\\b"
//! template = "Hello! Ask me about a place."
//!
//! [[responses]]
//! pattern = "^who won (.+)$"
//! template = "FORMAT: what won $1"
//! ```

use crate::services::{DEFAULT_NOVELTY_AMOUNT, DirectionPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the graph path.
pub const ENV_GRAPH_PATH: &str = "DOCENT_GRAPH";
/// Environment variable overriding the novelty amount.
pub const ENV_NOVELTY_AMOUNT: &str = "DOCENT_NOVELTY_AMOUNT";
/// Environment variable overriding the direction policy.
pub const ENV_DIRECTION_POLICY: &str = "DOCENT_DIRECTION_POLICY";

/// Main configuration for docent.
#[derive(Debug, Clone)]
pub struct DocentConfig {
    /// Path to the JSON feature graph.
    pub graph_path: Option<PathBuf>,
    /// Novelty suggestions per reply, and the recency window in turns.
    pub novelty_amount: usize,
    /// How overlapping direction words are resolved.
    pub direction_policy: DirectionPolicy,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Canned-response rules, in priority order.
    pub responses: Vec<ResponseSettings>,
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Output format: "pretty" or "json".
    pub format: Option<String>,
    /// Filter directive, e.g. "info" or "docent=debug".
    pub level: Option<String>,
    /// Log file path; stderr if unset.
    pub file: Option<String>,
}

/// One canned-response rule as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseSettings {
    /// Regex matched against the lowercased utterance.
    pub pattern: String,
    /// Reply template; a `FORMAT:` prefix makes it a directive.
    pub template: String,
    /// Optional regex the previous reply must match.
    #[serde(default)]
    pub after: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Graph path.
    pub graph_path: Option<String>,
    /// Novelty amount.
    pub novelty_amount: Option<usize>,
    /// Direction policy name.
    pub direction_policy: Option<String>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
    /// Canned-response rules.
    #[serde(default)]
    pub responses: Vec<ResponseSettings>,
}

impl Default for DocentConfig {
    fn default() -> Self {
        Self {
            graph_path: None,
            novelty_amount: DEFAULT_NOVELTY_AMOUNT,
            direction_policy: DirectionPolicy::default(),
            logging: LoggingSettings::default(),
            responses: Vec::new(),
        }
    }
}

impl DocentConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration TOML.
    pub fn from_toml_str(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;
        Self::from_toml_str(&contents)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/docent/` on macOS)
    /// 2. XDG config dir (`~/.config/docent/`)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("docent").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("docent")
                .join("config.toml"),
        ];
        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
                },
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `DocentConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(graph_path) = file.graph_path {
            config.graph_path = Some(PathBuf::from(graph_path));
        }
        if let Some(amount) = file.novelty_amount {
            config.novelty_amount = amount;
        }
        if let Some(policy) = file.direction_policy {
            config.direction_policy = DirectionPolicy::parse(&policy);
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }
        config.responses = file.responses;

        config
    }

    /// Applies `DOCENT_*` environment overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(ENV_GRAPH_PATH) {
            if !path.trim().is_empty() {
                self.graph_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(amount) = std::env::var(ENV_NOVELTY_AMOUNT) {
            match amount.trim().parse() {
                Ok(amount) => self.novelty_amount = amount,
                Err(e) => tracing::warn!(value = %amount, error = %e, "Ignoring {ENV_NOVELTY_AMOUNT}"),
            }
        }
        if let Ok(policy) = std::env::var(ENV_DIRECTION_POLICY) {
            self.direction_policy = DirectionPolicy::parse(&policy);
        }
        self
    }

    /// Sets the graph path.
    #[must_use]
    pub fn with_graph_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.graph_path = Some(path.into());
        self
    }

    /// Sets the novelty amount.
    #[must_use]
    pub const fn with_novelty_amount(mut self, amount: usize) -> Self {
        self.novelty_amount = amount;
        self
    }

    /// Sets the direction policy.
    #[must_use]
    pub const fn with_direction_policy(mut self, policy: DirectionPolicy) -> Self {
        self.direction_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocentConfig::new();
        assert_eq!(config.novelty_amount, DEFAULT_NOVELTY_AMOUNT);
        assert_eq!(config.direction_policy, DirectionPolicy::LongestMatch);
        assert!(config.graph_path.is_none());
        assert!(config.responses.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let config = DocentConfig::from_toml_str(
            r#"
            graph_path = "museum.json"
            novelty_amount = 3
            direction_policy = "last_match"

            [logging]
            format = "json"

            [[responses]]
            pattern = "^hi$"
            template = "Hello!"

            [[responses]]
            pattern = "^yes$"
            template = "Good."
            after = "want"
            "#,
        )
        .unwrap();

        assert_eq!(config.graph_path, Some(PathBuf::from("museum.json")));
        assert_eq!(config.novelty_amount, 3);
        assert_eq!(config.direction_policy, DirectionPolicy::LastMatch);
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert_eq!(config.responses.len(), 2);
        assert_eq!(config.responses[1].after.as_deref(), Some("want"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = DocentConfig::from_toml_str("novelty_amount = \"many\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "novelty_amount = 9\n").unwrap();
        let config = DocentConfig::load_from_file(&path).unwrap();
        assert_eq!(config.novelty_amount, 9);
    }

    #[test]
    fn test_builders() {
        let config = DocentConfig::new()
            .with_graph_path("g.json")
            .with_novelty_amount(2)
            .with_direction_policy(DirectionPolicy::LastMatch);
        assert_eq!(config.graph_path, Some(PathBuf::from("g.json")));
        assert_eq!(config.novelty_amount, 2);
        assert_eq!(config.direction_policy, DirectionPolicy::LastMatch);
    }
}
