//! AI-assisted drafting of the narrative answers.
//!
//! [`SuggestionService`] turns a [`SuggestionRequest`] into a
//! [`SuggestionResult`]. With a credential it prompts a remote model through
//! [`retry::retry_with_backoff`]; without one it answers from canned text.

pub mod classifier;
pub mod mock;
pub mod openrouter;
pub mod prompt;
pub mod retry;
pub mod review;
pub mod service;

pub use classifier::{ErrorInfo, ErrorKind, categorize_error};
pub use openrouter::OpenRouterGenerator;
pub use prompt::{BuiltPrompt, build_prompt};
pub use review::SuggestionReview;
pub use service::{
    CompletionRequest, GenerationError, SuggestionRequest, SuggestionResult, SuggestionService,
    TextGenerator,
};
