/*!
 * Remote-call classification and the per-call attempt loop.
 *
 * Every provider result is turned into a [`CallOutcome`]: a complete reply,
 * a length-truncated reply whose partial text is still usable, or a failed
 * attempt. The [`RetryController`] drives up to `max_attempts` sequential
 * attempts and decides what happens between two of them.
 */

use log::{error, warn};
use std::future::Future;
use std::time::Duration;

use crate::app_config::RetryConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{CompletionResponse, FinishReason, TokenUsage};

/// Text and accounting data of one usable reply
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResult {
    /// Raw reply text
    pub text: String,
    /// Why generation stopped
    pub finish_reason: FinishReason,
    /// Reported usage; zero when the service omitted it
    pub usage: TokenUsage,
    /// Model variant that served the call
    pub model: String,
}

impl CompletionResult {
    /// Read the last choice of `response`, if there is one
    fn from_response(response: CompletionResponse) -> Option<Self> {
        let usage = match response.usage {
            Some(usage) => usage,
            None => {
                warn!("Response from {} carried no usage data; counting zero tokens", response.model);
                TokenUsage::default()
            }
        };
        let CompletionResponse { model, mut choices, .. } = response;
        let choice = choices.pop()?;
        Some(Self {
            text: choice.content,
            finish_reason: choice.finish_reason,
            usage,
            model,
        })
    }
}

/// What went wrong in a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network or service failure without a usable payload
    Transient,
    /// The credential was rejected
    Credential,
    /// The reply arrived but is unusable as is
    MalformedReply,
}

/// A failed attempt
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl AttemptFailure {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transient,
            message: message.into(),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Credential,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::MalformedReply,
            message: message.into(),
        }
    }
}

/// Tagged result of one remote call
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    /// The service finished normally
    Complete(CompletionResult),
    /// The service stopped on its length limit; the partial text is usable
    TruncatedPartial(CompletionResult),
    /// Nothing usable came back
    Failed(AttemptFailure),
}

/// Classify the raw result of a provider call
pub fn classify(result: Result<CompletionResponse, ProviderError>) -> CallOutcome {
    match result {
        Ok(response) => match CompletionResult::from_response(response) {
            Some(r) if r.finish_reason == FinishReason::LengthTruncated => CallOutcome::TruncatedPartial(r),
            Some(r) => CallOutcome::Complete(r),
            None => CallOutcome::Failed(AttemptFailure::transient("Response contained no choices")),
        },
        Err(ProviderError::Incomplete {
            partial: Some(partial),
            message,
        }) if partial
            .last_choice()
            .is_some_and(|c| c.finish_reason == FinishReason::LengthTruncated) =>
        {
            warn!("Using partial payload of failed call: {}", message);
            match CompletionResult::from_response(*partial) {
                Some(r) => CallOutcome::TruncatedPartial(r),
                None => CallOutcome::Failed(AttemptFailure::transient(message)),
            }
        }
        Err(e @ ProviderError::AuthenticationError(_)) => CallOutcome::Failed(AttemptFailure::credential(e.to_string())),
        Err(e) => CallOutcome::Failed(AttemptFailure::transient(e.to_string())),
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Move to the next credential without waiting
    RotateNow,
    /// Wait, then retry with the next credential
    Backoff(Duration),
    /// Retry at once
    RetryNow,
    /// Give up
    Abort,
}

/// Bounded, sequential attempt loop for one remote call
#[derive(Debug, Clone)]
pub struct RetryController {
    max_attempts: usize,
    pool_size: usize,
    rate_window: Duration,
}

impl RetryController {
    pub fn new(config: &RetryConfig, pool_size: usize) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            pool_size: pool_size.max(1),
            rate_window: Duration::from_secs(config.rate_window_secs),
        }
    }

    /// Pause after a transient failure
    ///
    /// The per-minute budget is spread over the credential pool, so larger
    /// pools wait less.
    pub fn backoff_delay(&self) -> Duration {
        self.rate_window / u32::try_from(self.pool_size).unwrap_or(u32::MAX)
    }

    /// Decide what follows failed attempt number `attempt` (1-based)
    pub fn decide(&self, attempt: usize, failure: &AttemptFailure) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::Abort;
        }
        match failure.kind {
            FailureKind::Credential if self.pool_size > 1 => RetryDecision::RotateNow,
            FailureKind::MalformedReply => RetryDecision::RetryNow,
            _ => RetryDecision::Backoff(self.backoff_delay()),
        }
    }

    /// Run `attempt` until it succeeds or the attempt cap is reached
    ///
    /// `attempt` receives the 1-based attempt number. The attempts never
    /// overlap; each waits for the previous one and its pause.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, TranslationError>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<T, AttemptFailure>>,
    {
        let mut number = 1;
        loop {
            let failure = match attempt(number).await {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };

            match self.decide(number, &failure) {
                RetryDecision::Abort => {
                    error!("Attempt {}/{} failed, giving up: {}", number, self.max_attempts, failure.message);
                    return Err(TranslationError::ExhaustedRetries {
                        attempts: number,
                        last_error: failure.message,
                    });
                }
                RetryDecision::Backoff(delay) => {
                    warn!(
                        "Attempt {}/{} failed: {}. Retrying in {:.1}s",
                        number,
                        self.max_attempts,
                        failure.message,
                        delay.as_secs_f64()
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                RetryDecision::RotateNow => {
                    warn!(
                        "Attempt {}/{} rejected the credential: {}. Rotating",
                        number, self.max_attempts, failure.message
                    );
                }
                RetryDecision::RetryNow => {
                    warn!("Attempt {}/{} returned an unusable reply: {}", number, self.max_attempts, failure.message);
                }
            }
            number += 1;
        }
    }
}
