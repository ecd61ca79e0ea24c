//! Configuration for the todo shell.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Shell configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Tracing filter directives (`TODO_LOG`, then `RUST_LOG`)
    pub log_filter: String,
    /// Prompt printed before each line is read (`TODO_PROMPT`)
    pub prompt: String,
    /// Echo each command back after the prompt, for piped input (`TODO_ECHO`)
    pub echo: bool,
}

impl ShellConfig {
    /// Filter used when none is configured
    pub const DEFAULT_LOG_FILTER: &'static str = "todo=info,composable_todo_runtime=warn";

    /// Prompt used when none is configured
    pub const DEFAULT_PROMPT: &'static str = "> ";

    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        Self {
            log_filter: non_blank("TODO_LOG")
                .or_else(|| non_blank("RUST_LOG"))
                .unwrap_or_else(|| Self::DEFAULT_LOG_FILTER.to_string()),
            prompt: lookup("TODO_PROMPT").unwrap_or_else(|| Self::DEFAULT_PROMPT.to_string()),
            echo: lookup("TODO_ECHO")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(false),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ShellConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ShellConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.log_filter, ShellConfig::DEFAULT_LOG_FILTER);
        assert_eq!(config.prompt, "> ");
        assert!(!config.echo);
    }

    #[test]
    fn todo_log_wins_over_rust_log() {
        let config = config_from(&[("TODO_LOG", "todo=trace"), ("RUST_LOG", "warn")]);
        assert_eq!(config.log_filter, "todo=trace");

        let config = config_from(&[("RUST_LOG", "warn")]);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn blank_todo_log_falls_through_to_rust_log() {
        let config = config_from(&[("TODO_LOG", "  "), ("RUST_LOG", "debug")]);
        assert_eq!(config.log_filter, "debug");

        let config = config_from(&[("TODO_LOG", ""), ("RUST_LOG", "")]);
        assert_eq!(config.log_filter, ShellConfig::DEFAULT_LOG_FILTER);
    }

    #[test]
    fn prompt_may_be_empty() {
        let config = config_from(&[("TODO_PROMPT", "")]);
        assert_eq!(config.prompt, "");
    }

    #[test]
    fn echo_flag_parsing() {
        assert!(config_from(&[("TODO_ECHO", "yes")]).echo);
        assert!(config_from(&[("TODO_ECHO", "1")]).echo);
        assert!(!config_from(&[("TODO_ECHO", "off")]).echo);
        assert!(!config_from(&[("TODO_ECHO", "maybe")]).echo);
    }
}
