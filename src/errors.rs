/*!
 * Error types for the paratrans library.
 *
 * This module contains custom error types for the remote completion service
 * and the batch translation pipeline, using the thiserror crate for ergonomic
 * error definitions.
 */

use thiserror::Error;

use crate::providers::CompletionResponse;

/// Errors that can occur when talking to a completion provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication (revoked key, exhausted quota)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The call failed but the service may still have produced a payload.
    ///
    /// A partial payload whose last choice stopped on the length limit is
    /// usable; anything else is a plain failure.
    #[error("Incomplete response: {message}")]
    Incomplete {
        /// Description of the failure
        message: String,
        /// Whatever the service returned before failing
        partial: Option<Box<CompletionResponse>>,
    },
}

/// Errors that can occur during batch translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Every attempt for a batch failed. The only fatal pipeline error.
    #[error("Gave up after {attempts} consecutive failed attempts: {last_error}")]
    ExhaustedRetries {
        /// Number of attempts made
        attempts: usize,
        /// Message of the last failure
        last_error: String,
    },

    /// No credentials were configured
    #[error("Credential pool is empty")]
    EmptyCredentialPool,

    /// A batch exceeded its caller-level deadline
    #[error("Batch {batch} timed out after {secs}s")]
    Timeout {
        /// Zero-based batch index
        batch: usize,
        /// Configured timeout
        secs: u64,
    },

    /// The tokenizer for the configured model could not be loaded
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}
