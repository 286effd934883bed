use log::debug;

use crate::app_config::{ModelRouting, PromptStyle, TranslationConfig};
use crate::providers::{ChatMessage, CompletionRequest};
use crate::translation::tokens::{ModelTier, TokenEstimator};

use super::templates::{two_pass_payload, PromptTemplate};

/// A fully built request, minus the credential
///
/// Built fresh for every attempt and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    /// Ordered conversation
    pub messages: Vec<ChatMessage>,
    /// Model identifier sent to the service
    pub model: String,
    /// Routed tier; `None` when a private deployment bypasses routing
    pub tier: Option<ModelTier>,
    /// Private deployment override
    pub deployment_id: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Estimated prompt tokens used for routing
    pub estimated_tokens: usize,
}

impl Prompt {
    /// Attach a credential and turn the prompt into a provider request
    pub fn into_request(self, api_key: String) -> CompletionRequest {
        CompletionRequest {
            model: self.model,
            messages: self.messages,
            temperature: self.temperature,
            deployment_id: self.deployment_id,
            api_key,
        }
    }
}

/// Turns batch text into a routed prompt
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    style: PromptStyle,
    user_template: PromptTemplate,
    system_template: Option<PromptTemplate>,
    language: String,
    temperature: f32,
    routing: ModelRouting,
    deployment_id: Option<String>,
}

impl PromptAssembler {
    /// Create an assembler for `language` (a language name, not a code)
    pub fn new(config: &TranslationConfig, language: &str) -> Self {
        Self {
            style: config.prompt.style,
            user_template: config
                .prompt
                .user_template
                .as_deref()
                .map(PromptTemplate::new)
                .unwrap_or_default(),
            system_template: config.prompt.system_template.as_deref().map(PromptTemplate::new),
            language: language.to_string(),
            temperature: config.temperature,
            routing: config.routing.clone(),
            deployment_id: config.deployment_id.clone().filter(|id| !id.is_empty()),
        }
    }

    /// Target language name
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Conversation for `text` in the configured layout
    pub fn messages(&self, text: &str) -> Vec<ChatMessage> {
        match self.style {
            PromptStyle::TwoPass => vec![
                ChatMessage::system(PromptTemplate::TWO_PASS_SYSTEM),
                ChatMessage::user(PromptTemplate::two_pass_guideline().render("", &self.language)),
                ChatMessage::assistant(PromptTemplate::ACKNOWLEDGMENT),
                ChatMessage::user(two_pass_payload(text, &self.language)),
            ],
            PromptStyle::Template => {
                let mut messages = Vec::with_capacity(2);
                let system = self
                    .system_template
                    .as_ref()
                    .map(|t| t.render("", &self.language))
                    .unwrap_or_default();
                if !system.trim().is_empty() {
                    messages.push(ChatMessage::system(system));
                }
                messages.push(ChatMessage::user(self.user_template.render(text, &self.language)));
                messages
            }
        }
    }

    /// Build the prompt for `text`, routing it by estimated size
    pub fn assemble(&self, text: &str, estimator: &TokenEstimator) -> Prompt {
        let messages = self.messages(text);
        let estimated_tokens = estimator.count_messages(&messages);

        let (model, tier) = match &self.deployment_id {
            Some(deployment) => (deployment.clone(), None),
            None => {
                let tier = estimator.route(estimated_tokens, &self.routing);
                (tier.model_name(&self.routing).to_string(), Some(tier))
            }
        };

        debug!(
            "Prompt of ~{} tokens routed to {}{}",
            estimated_tokens,
            model,
            if tier.is_none() { " (private deployment)" } else { "" }
        );

        Prompt {
            messages,
            model,
            tier,
            deployment_id: self.deployment_id.clone(),
            temperature: self.temperature,
            estimated_tokens,
        }
    }
}
