use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::language::Language;
use crate::suggest::retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const MODEL_VAR: &str = "SUGGESTION_MODEL";
pub const MAX_TOKENS_VAR: &str = "SUGGESTION_MAX_TOKENS";
pub const MAX_RETRIES_VAR: &str = "SUGGESTION_MAX_RETRIES";
pub const DATA_DIR_VAR: &str = "WIZARD_DATA_DIR";
pub const LANGUAGE_VAR: &str = "WIZARD_LANGUAGE";

pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u64 = 200;
pub const DEFAULT_DATA_DIR: &str = ".benefits-wizard";
pub const TEMPERATURE: f64 = 0.7;

// Values shipped in sample env files; treated as "no credential".
const PLACEHOLDER_KEYS: &[&str] = &["your_api_key_here", "your_openrouter_api_key_here"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Settings of the suggestion pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionConfig {
    /// `None` selects the canned mock responses.
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u64,
    pub max_retries: u32,
    pub base_delay: Duration,
    pub temperature: f64,
    /// Simulated latency range of the mock path.
    pub mock_delay: (Duration, Duration),
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            temperature: TEMPERATURE,
            mock_delay: (Duration::from_secs(1), Duration::from_secs(3)),
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value: v }),
    }
}

impl SuggestionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && !PLACEHOLDER_KEYS.contains(&key.as_str()));

        let model = lookup(MODEL_VAR)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            model,
            max_tokens: parse_number(MAX_TOKENS_VAR, lookup(MAX_TOKENS_VAR), DEFAULT_MAX_TOKENS)?,
            max_retries: parse_number(MAX_RETRIES_VAR, lookup(MAX_RETRIES_VAR), DEFAULT_MAX_RETRIES)?,
            ..Self::default()
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Everything the binary reads from its environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub suggestion: SuggestionConfig,
    pub data_dir: PathBuf,
    pub language: Language,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            suggestion: SuggestionConfig::from_lookup(&lookup)?,
            data_dir: lookup(DATA_DIR_VAR)
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            language: lookup(LANGUAGE_VAR)
                .map(|code| Language::parse(&code))
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.suggestion, SuggestionConfig::default());
        assert!(!config.suggestion.has_credential());
        assert_eq!(config.suggestion.model, "openai/gpt-4o-mini");
        assert_eq!(config.suggestion.max_tokens, 200);
        assert_eq!(config.suggestion.max_retries, 3);
        assert_eq!(config.language, Language::En);
        assert_eq!(config.data_dir, PathBuf::from(".benefits-wizard"));
    }

    #[test]
    fn placeholder_key_means_mock_mode() {
        let config =
            SuggestionConfig::from_lookup(lookup(&[(API_KEY_VAR, "your_api_key_here")])).unwrap();
        assert!(!config.has_credential());

        let config = SuggestionConfig::from_lookup(lookup(&[(API_KEY_VAR, " sk-or-123 ")])).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-or-123"));
    }

    #[test]
    fn overrides_and_bad_numbers() {
        let config = AppConfig::from_lookup(lookup(&[
            (MODEL_VAR, "anthropic/claude-3-haiku"),
            (MAX_TOKENS_VAR, "350"),
            (MAX_RETRIES_VAR, "1"),
            (LANGUAGE_VAR, "ar"),
            (DATA_DIR_VAR, "/tmp/wizard"),
        ]))
        .unwrap();
        assert_eq!(config.suggestion.model, "anthropic/claude-3-haiku");
        assert_eq!(config.suggestion.max_tokens, 350);
        assert_eq!(config.suggestion.max_retries, 1);
        assert_eq!(config.language, Language::Ar);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/wizard"));

        let err = SuggestionConfig::from_lookup(lookup(&[(MAX_RETRIES_VAR, "many")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: MAX_RETRIES_VAR,
                value: "many".into()
            }
        );
    }
}
