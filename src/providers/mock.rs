/*!
 * Mock provider implementation for testing.
 *
 * The mock never touches the network. It either echoes the numbered
 * paragraphs it receives back as a structured translation, or plays a script
 * of canned replies, and records every call it sees:
 * - `MockProvider::working()` - Echoes every paragraph as "[TRANSLATED] ..."
 * - `MockProvider::failing()` - Always fails with a transient error
 * - `MockProvider::scripted(replies)` - Plays the replies in order, then echoes
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{
    ChatMessage, Choice, CompletionRequest, CompletionResponse, FinishReason, Provider, Role, TokenUsage,
};

static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d+)\) (.*)").expect("valid regex"));

/// Type of error to simulate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockFailure {
    /// Connection error
    Connection,
    /// Rate limit error
    RateLimit,
    /// Authentication error (revoked or exhausted key)
    Auth,
    /// API error with the given status
    Api(u16),
    /// Failure without any usable payload
    IncompleteWithoutPayload,
}

impl MockFailure {
    fn to_error(self) -> ProviderError {
        match self {
            Self::Connection => ProviderError::ConnectionError("Simulated connection reset".into()),
            Self::RateLimit => ProviderError::RateLimitExceeded("Simulated rate limit".into()),
            Self::Auth => ProviderError::AuthenticationError("Simulated invalid key".into()),
            Self::Api(status_code) => ProviderError::ApiError {
                status_code,
                message: "Simulated provider failure".into(),
            },
            Self::IncompleteWithoutPayload => ProviderError::Incomplete {
                message: "Simulated stream cut".into(),
                partial: None,
            },
        }
    }
}

/// One scripted reply
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Successful reply with the given text
    Text(String),
    /// Successful reply that stopped on the length limit
    LengthTruncated(String),
    /// Failed call that still carries a length-truncated partial payload
    IncompleteTruncated(String),
    /// Failed call
    Fail(MockFailure),
    /// Echo the numbered paragraphs of the request
    Echo,
}

/// Behavior once the script is exhausted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Echo the numbered paragraphs of the request
    Working,
    /// Always fail with the given error
    Failing(MockFailure),
}

/// A call the mock received
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Credential used for the call
    pub api_key: String,
    /// Requested model
    pub model: String,
    /// Requested private deployment
    pub deployment_id: Option<String>,
    /// Messages sent
    pub messages: Vec<ChatMessage>,
    /// Temperature sent
    pub temperature: f32,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior when no scripted reply is left
    behavior: MockBehavior,
    /// Replies to play in order
    script: Arc<Mutex<VecDeque<MockReply>>>,
    /// Every call received, shared between clones
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    /// Model reported back; defaults to the requested one
    served_model: Option<String>,
    /// Usage reported on every successful reply
    usage: Option<TokenUsage>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            served_model: None,
            usage: Some(TokenUsage { prompt_tokens: 10, completion_tokens: 10 }),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors with a connection failure
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing(MockFailure::Connection))
    }

    /// Create a mock that plays `replies` in order, then echoes
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        let provider = Self::working();
        provider.script.lock().extend(replies);
        provider
    }

    /// Report this model instead of the requested one
    pub fn with_served_model(mut self, model: impl Into<String>) -> Self {
        self.served_model = Some(model.into());
        self
    }

    /// Report this usage on successful replies (`None` omits usage)
    pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
        self.usage = usage;
        self
    }

    /// All calls received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Render `entries` as a numbered, line-per-paragraph reply
    pub fn numbered_reply(entries: &[&str]) -> String {
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("({}) {}", i + 1, entry))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Wrap `text` in the two-field structured reply format
    pub fn structured_reply(direct: &str, better: &str) -> String {
        format!(
            "[{{\"direct_translation\": \"{}\",\n\"better_translation\": \"{}\",}}]",
            direct, better
        )
    }

    /// Echo the numbered paragraphs of the last user message
    fn echo(request: &CompletionRequest) -> String {
        let payload = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let lines: Vec<String> = payload
            .lines()
            .filter_map(|line| {
                let captures = NUMBERED_LINE.captures(line)?;
                let body = captures[2].split("\",\"target_language\"").next().unwrap_or_default();
                Some(format!("({}) [TRANSLATED] {}", &captures[1], body.trim()))
            })
            .collect();

        let joined = lines.join("\n");
        Self::structured_reply(&joined, &joined)
    }

    fn response(&self, request: &CompletionRequest, content: String, finish_reason: FinishReason) -> CompletionResponse {
        CompletionResponse {
            model: self.served_model.clone().unwrap_or_else(|| request.model.clone()),
            choices: vec![Choice { content, finish_reason }],
            usage: self.usage,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        self.calls.lock().push(RecordedCall {
            api_key: request.api_key.clone(),
            model: request.model.clone(),
            deployment_id: request.deployment_id.clone(),
            messages: request.messages.clone(),
            temperature: request.temperature,
        });

        let reply = self.script.lock().pop_front();
        let reply = match (reply, self.behavior) {
            (Some(reply), _) => reply,
            (None, MockBehavior::Working) => MockReply::Echo,
            (None, MockBehavior::Failing(failure)) => MockReply::Fail(failure),
        };

        match reply {
            MockReply::Text(text) => Ok(self.response(&request, text, FinishReason::Complete)),
            MockReply::LengthTruncated(text) => Ok(self.response(&request, text, FinishReason::LengthTruncated)),
            MockReply::IncompleteTruncated(text) => Err(ProviderError::Incomplete {
                message: "Simulated failure after length limit".into(),
                partial: Some(Box::new(self.response(&request, text, FinishReason::LengthTruncated))),
            }),
            MockReply::Fail(failure) => Err(failure.to_error()),
            MockReply::Echo => {
                let text = Self::echo(&request);
                Ok(self.response(&request, text, FinishReason::Complete))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
