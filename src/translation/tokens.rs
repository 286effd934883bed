/*!
 * Token estimation and model routing.
 *
 * Prompts are measured with the byte-pair tokenizer of the configured model
 * family, falling back to the generic `cl100k_base` encoding when the model is
 * unknown. The count only feeds one decision: whether the prompt goes to the
 * standard model or to its long-context variant.
 */

use log::debug;
use std::fmt;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

use crate::app_config::ModelRouting;
use crate::errors::TranslationError;
use crate::providers::{ChatMessage, Role};

/// Tokens added per chat message by the chat format
const TOKENS_PER_MESSAGE: usize = 3;
/// Tokens priming every reply
const TOKENS_PER_REPLY: usize = 3;

/// Which model variant serves a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTier {
    Standard,
    LongContext,
}

impl ModelTier {
    /// The model identifier configured for this tier
    pub fn model_name<'a>(&self, routing: &'a ModelRouting) -> &'a str {
        match self {
            Self::Standard => &routing.standard_model,
            Self::LongContext => &routing.long_context_model,
        }
    }

    /// Tier of the model variant that actually served a request
    ///
    /// Versioned names such as `gpt-3.5-turbo-16k-0613` and private
    /// deployments such as `gpt-35-turbo-16k` resolve through the suffix that
    /// distinguishes the long-context model from the standard one.
    pub fn of_served_model(model: &str, routing: &ModelRouting) -> Self {
        if model.starts_with(&routing.long_context_model) {
            return Self::LongContext;
        }
        let suffix = routing
            .long_context_model
            .strip_prefix(&routing.standard_model)
            .filter(|s| !s.is_empty());
        match suffix {
            Some(suffix) if model.contains(suffix) => Self::LongContext,
            _ => Self::Standard,
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::LongContext => write!(f, "long-context"),
        }
    }
}

/// Deterministic token counter for one model family
#[derive(Clone)]
pub struct TokenEstimator {
    /// Model the tokenizer was requested for
    model: String,
    /// Loaded encoding
    bpe: Arc<CoreBPE>,
}

impl fmt::Debug for TokenEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEstimator").field("model", &self.model).finish()
    }
}

impl TokenEstimator {
    /// Load the tokenizer for `model`, or the generic encoding if unknown
    pub fn new(model: &str) -> Result<Self, TranslationError> {
        let bpe = match tiktoken_rs::get_bpe_from_model(model) {
            Ok(bpe) => bpe,
            Err(e) => {
                debug!("No tokenizer for model '{}' ({}), using cl100k_base", model, e);
                tiktoken_rs::cl100k_base().map_err(|e| TranslationError::Tokenizer(e.to_string()))?
            }
        };

        Ok(Self {
            model: model.to_string(),
            bpe: Arc::new(bpe),
        })
    }

    /// Number of tokens in `text`
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    /// Number of tokens a chat conversation costs, format overhead included
    pub fn count_messages(&self, messages: &[ChatMessage]) -> usize {
        let body: usize = messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                TOKENS_PER_MESSAGE + self.count(role) + self.count(&m.content)
            })
            .sum();
        body + TOKENS_PER_REPLY
    }

    /// Pick the model tier for a prompt of `tokens` estimated tokens
    pub fn route(&self, tokens: usize, routing: &ModelRouting) -> ModelTier {
        if tokens <= routing.token_threshold {
            ModelTier::Standard
        } else {
            ModelTier::LongContext
        }
    }
}
