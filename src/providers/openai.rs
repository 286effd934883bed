use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{ChatMessage, Choice, CompletionRequest, CompletionResponse, FinishReason, Provider, TokenUsage};

/// Client for OpenAI-compatible chat completion endpoints
///
/// Public endpoints are addressed by model name with bearer authentication.
/// When a request carries a deployment id the call goes to the private
/// deployment route instead and authenticates with an `api-key` header.
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// Base endpoint URL, without trailing slash
    endpoint: String,
    /// API version used for private deployments
    api_version: String,
}

/// Chat completion request body
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    temperature: f32,
}

/// Message returned inside a choice
#[derive(Debug, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender
    #[serde(default)]
    pub role: String,
    /// Content of the message
    #[serde(default)]
    pub content: Option<String>,
}

/// A single choice of a chat completion
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    /// The generated message
    #[serde(default)]
    pub message: Option<OpenAIMessage>,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage block of a chat completion
#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    /// Model variant that served the request
    #[serde(default)]
    pub model: Option<String>,
    /// Candidate replies
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
    /// Token usage information
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

impl OpenAIResponse {
    /// Convert the wire response into the provider-neutral shape
    pub fn into_completion(self, fallback_model: &str) -> CompletionResponse {
        CompletionResponse {
            model: self.model.unwrap_or_else(|| fallback_model.to_string()),
            choices: self
                .choices
                .into_iter()
                .map(|c| Choice {
                    content: c.message.and_then(|m| m.content).unwrap_or_default(),
                    finish_reason: FinishReason::from_api(c.finish_reason.as_deref()),
                })
                .collect(),
            usage: self.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            }),
        }
    }
}

impl OpenAI {
    /// Create a new client
    ///
    /// # Arguments
    /// * `endpoint` - Base URL, e.g. `https://api.openai.com/v1`
    /// * `api_version` - API version for private deployments
    /// * `timeout_secs` - Per-request timeout
    pub fn new(endpoint: &str, api_version: impl Into<String>, timeout_secs: u64) -> Result<Self, ProviderError> {
        let parsed = Url::parse(endpoint)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: parsed.as_str().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
        })
    }

    /// URL for a request, depending on whether it targets a private deployment
    fn url_for(&self, deployment_id: Option<&str>) -> String {
        match deployment_id {
            Some(id) => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.endpoint, id, self.api_version
            ),
            None => format!("{}/chat/completions", self.endpoint),
        }
    }

    /// Map a non-success HTTP status and body onto a provider error
    fn error_for_status(status: StatusCode, body: &str, fallback_model: &str) -> ProviderError {
        match status.as_u16() {
            401 | 403 => ProviderError::AuthenticationError(body.to_string()),
            429 => ProviderError::RateLimitExceeded(body.to_string()),
            code => {
                // Some gateways return the generated choices alongside an error status
                let partial = serde_json::from_str::<OpenAIResponse>(body)
                    .ok()
                    .filter(|r| !r.choices.is_empty())
                    .map(|r| Box::new(r.into_completion(fallback_model)));

                match partial {
                    Some(partial) => ProviderError::Incomplete {
                        message: format!("HTTP {}", code),
                        partial: Some(partial),
                    },
                    None => ProviderError::ApiError {
                        status_code: code,
                        message: body.to_string(),
                    },
                }
            }
        }
    }
}

#[async_trait]
impl Provider for OpenAI {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let url = self.url_for(request.deployment_id.as_deref());
        let fallback_model = request.deployment_id.clone().unwrap_or_else(|| request.model.clone());

        let body = OpenAIRequest {
            model: request.deployment_id.is_none().then(|| request.model.clone()),
            messages: request.messages,
            temperature: request.temperature,
        };

        debug!("POST {} ({} messages)", url, body.messages.len());

        let builder = self.client.post(&url).header("Content-Type", "application/json");
        let builder = if request.deployment_id.is_some() {
            builder.header("api-key", &request.api_key)
        } else {
            builder.bearer_auth(&request.api_key)
        };

        let response = builder.json(&body).send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                ProviderError::ConnectionError(e.to_string())
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!("OpenAI API error ({}): {}", status, text);
            return Err(Self::error_for_status(status, &text, &fallback_model));
        }

        let parsed: OpenAIResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", e, text)))?;

        Ok(parsed.into_completion(&fallback_model))
    }

    fn name(&self) -> &str {
        "openai"
    }
}
