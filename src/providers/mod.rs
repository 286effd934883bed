/*!
 * Provider implementations for the remote completion service.
 *
 * The translation core only needs one capability from a provider:
 * `complete(messages, model, temperature) -> (text, finish_reason, usage)`.
 * This module defines the request/response shapes of that contract and the
 * clients that implement it:
 * - OpenAI: OpenAI-compatible chat completions, including private deployments
 * - Mock: scripted provider used by tests and benchmarks
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Chat message object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// A single completion call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier (ignored by private deployments)
    pub model: String,
    /// Ordered conversation
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Private deployment/engine override
    pub deployment_id: Option<String>,
    /// Credential to authenticate this call with
    pub api_key: String,
}

/// Why the service stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    /// Natural end of output
    Complete,
    /// Output budget exhausted
    LengthTruncated,
    /// Anything else the service reports
    Other(String),
}

impl FinishReason {
    /// Map the wire value of `finish_reason`
    pub fn from_api(value: Option<&str>) -> Self {
        match value {
            Some("stop") | Some("complete") => Self::Complete,
            Some("length") => Self::LengthTruncated,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other("unknown".to_string()),
        }
    }
}

/// One candidate reply
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// Reply text
    pub content: String,
    /// Finish reason for this choice
    pub finish_reason: FinishReason,
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    pub prompt_tokens: u64,
    /// Number of completion tokens
    pub completion_tokens: u64,
}

/// Response of a completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Model variant that actually served the request
    pub model: String,
    /// Candidate replies
    pub choices: Vec<Choice>,
    /// Reported usage, if any
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// The choice the pipeline reads from
    pub fn last_choice(&self) -> Option<&Choice> {
        self.choices.last()
    }
}

/// Common trait for all completion providers
///
/// Implementations are shared across concurrent batch workers, so they must
/// be `Send + Sync` and hold no per-batch state.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<CompletionResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

pub mod mock;
pub mod openai;
