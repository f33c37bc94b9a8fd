use async_trait::async_trait;
use rig::{client::CompletionClient, completion::Prompt, providers::openrouter};
use tracing::debug;

use super::service::{CompletionRequest, GenerationError, TextGenerator};

/// [`TextGenerator`] backed by an OpenRouter chat model.
pub struct OpenRouterGenerator {
    client: openrouter::Client,
}

impl OpenRouterGenerator {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: openrouter::Client::new(api_key),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenRouterGenerator {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let agent = self
            .client
            .agent(&request.model)
            .preamble(&request.system_message)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build();

        debug!(model = %request.model, "Sending completion request");
        agent
            .prompt(request.prompt.as_str())
            .await
            .map_err(|e| GenerationError::from_error(&e))
    }
}
