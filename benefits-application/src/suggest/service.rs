use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::classifier::{ErrorInfo, ErrorKind, categorize_error};
use super::mock::mock_suggestion;
use super::openrouter::OpenRouterGenerator;
use super::prompt::build_prompt;
use super::retry::retry_with_backoff;
use crate::config::SuggestionConfig;
use crate::language::Language;
use crate::models::{ContextualFormData, FieldKind};

/// Failure of the remote text-generation call, carrying the provider's message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GenerationError {
    pub message: String,
}

impl GenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Keep the whole cause chain of `err`, joined with ": ". Transport
    /// failures only name the refused connection or timeout in their sources.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        Self { message }
    }
}

/// One call to the text-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_message: String,
    pub prompt: String,
    pub max_tokens: u64,
    pub temperature: f64,
}

/// Remote text-generation boundary.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub field_kind: FieldKind,
    pub language: Language,
    pub context: Option<ContextualFormData>,
}

/// Outcome of [`SuggestionService::generate_suggestion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResult {
    pub succeeded: bool,
    pub text: String,
    pub error_info: Option<ErrorInfo>,
}

impl SuggestionResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            text: text.into(),
            error_info: None,
        }
    }

    pub fn failure(error_info: ErrorInfo) -> Self {
        Self {
            succeeded: false,
            text: String::new(),
            error_info: Some(error_info),
        }
    }

    /// The appendable second sentence for a failed result.
    pub fn additional_message(&self, language: Language) -> String {
        self.error_info
            .as_ref()
            .map(|info| info.additional_message(language))
            .unwrap_or_default()
    }
}

/// Drafts narrative answers, remotely when a credential is configured and
/// from canned text otherwise.
#[derive(Clone)]
pub struct SuggestionService {
    config: SuggestionConfig,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl SuggestionService {
    pub fn new(config: SuggestionConfig, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { config, generator }
    }

    /// Use OpenRouter when the config carries a credential, the mock path otherwise.
    pub fn from_config(config: SuggestionConfig) -> Self {
        let generator = config
            .api_key
            .as_deref()
            .map(|key| Arc::new(OpenRouterGenerator::new(key)) as Arc<dyn TextGenerator>);
        Self::new(config, generator)
    }

    pub fn is_mock(&self) -> bool {
        self.generator.is_none()
    }

    /// Never fails: every error ends up in [`SuggestionResult::error_info`].
    pub async fn generate_suggestion(&self, request: &SuggestionRequest) -> SuggestionResult {
        let Some(generator) = &self.generator else {
            return self.mock(request).await;
        };

        let built = build_prompt(request.field_kind, request.language, request.context.as_ref());
        let completion = CompletionRequest {
            model: self.config.model.clone(),
            system_message: built.system_message,
            prompt: built.prompt,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        info!(
            field = request.field_kind.as_str(),
            language = %request.language,
            model = %completion.model,
            "Requesting suggestion"
        );

        let generator = generator.as_ref();
        let completion = &completion;
        let outcome = retry_with_backoff(
            move || generator.generate(completion),
            self.config.max_retries,
            self.config.base_delay,
            request.language,
        )
        .await;

        match outcome {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    warn!(field = request.field_kind.as_str(), "Suggestion came back empty");
                    return SuggestionResult::failure(ErrorInfo::new(
                        ErrorKind::Unknown,
                        request.language,
                        None,
                    ));
                }
                SuggestionResult::success(text)
            }
            Err(error) => SuggestionResult::failure(categorize_error(&error.message, request.language)),
        }
    }

    async fn mock(&self, request: &SuggestionRequest) -> SuggestionResult {
        let delay = self.mock_delay();
        info!(
            field = request.field_kind.as_str(),
            delay_ms = delay.as_millis() as u64,
            "No credential configured, using mock suggestion"
        );
        tokio::time::sleep(delay).await;
        SuggestionResult::success(mock_suggestion(
            request.field_kind,
            request.language,
            request.context.as_ref(),
        ))
    }

    fn mock_delay(&self) -> Duration {
        let (a, b) = self.config.mock_delay;
        let (low, high) = (a.min(b).as_millis() as u64, a.max(b).as_millis() as u64);
        Duration::from_millis(rand::rng().random_range(low..=high))
    }
}
