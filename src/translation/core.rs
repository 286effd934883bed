/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which translates one
 * batch of paragraphs: it builds the combined batch text, performs the remote
 * call through the retry loop, parses the reply and reconciles the segment
 * count with the paragraph count.
 */

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, ModelRouting, TranslationConfig};
use crate::errors::TranslationError;
use crate::language_utils::get_language_name;
use crate::providers::openai::OpenAI;
use crate::providers::Provider;

use super::alignment::{reconcile, AlignmentOutcome, ReconcilePolicy};
use super::credentials::CredentialRotator;
use super::diagnostics::{write_best_effort, DiagnosticRecord, DiagnosticSinks};
use super::document::Paragraph;
use super::ledger::CostLedger;
use super::parser::ResponseParser;
use super::prompts::{PromptAssembler, RequestBuilder};
use super::retry::{classify, AttemptFailure, CallOutcome, RetryController};
use super::tokens::{ModelTier, TokenEstimator};

/// Batch translation service
///
/// Cloning is cheap; clones share the credential cursor and the cost ledger.
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Remote completion service
    provider: Arc<dyn Provider>,

    /// Shared credential pool
    credentials: Arc<CredentialRotator>,

    /// Shared spend tracker
    ledger: Arc<CostLedger>,

    /// Prompt sizing
    estimator: TokenEstimator,

    /// Message layout and routing
    assembler: PromptAssembler,

    /// Batch text assembly
    builder: RequestBuilder,

    /// Per-call attempt loop
    retry: RetryController,

    /// Segment-count reconciliation bounds
    alignment: ReconcilePolicy,

    /// Model names, used to price served models
    routing: ModelRouting,

    /// Diagnostic destinations
    sinks: DiagnosticSinks,
}

impl TranslationService {
    /// Create a new translation service for `language` (a language name)
    pub fn new(config: &TranslationConfig, language: &str, provider: Arc<dyn Provider>) -> Result<Self, TranslationError> {
        let credentials = CredentialRotator::new(config.api_keys.clone())?;
        let retry = RetryController::new(&config.retry, credentials.pool_size());

        Ok(Self {
            provider,
            retry,
            credentials: Arc::new(credentials),
            ledger: Arc::new(CostLedger::new(config.pricing)),
            estimator: TokenEstimator::new(&config.routing.tokenizer_model)?,
            assembler: PromptAssembler::new(config, language),
            builder: RequestBuilder::new(),
            alignment: ReconcilePolicy {
                max_retries: config.retry.alignment_retries,
                retry_delay: Duration::from_secs(config.retry.alignment_retry_delay_secs),
            },
            routing: config.routing.clone(),
            sinks: DiagnosticSinks::in_dir(&config.diagnostics.log_dir),
        })
    }

    /// Create a service talking to the configured OpenAI-compatible endpoint
    pub fn from_config(config: &Config) -> Result<Self> {
        let language = get_language_name(&config.target_language)?;
        let translation = &config.translation;
        let provider = OpenAI::new(&translation.endpoint, translation.api_version.clone(), translation.timeout_secs)?;
        info!(
            "Translating to {} with {} credential(s) via {}",
            language,
            translation.api_keys.len(),
            provider.name()
        );
        Ok(Self::new(translation, &language, Arc::new(provider))?)
    }

    /// Replace the diagnostic sinks
    pub fn with_sinks(mut self, sinks: DiagnosticSinks) -> Self {
        self.sinks = sinks;
        self
    }

    /// Spend so far, shared by all clones
    pub fn ledger(&self) -> &CostLedger {
        &self.ledger
    }

    /// Target language name
    pub fn language(&self) -> &str {
        self.assembler.language()
    }

    /// Translate `text` with one remote call and return the combined translation
    ///
    /// Transient failures are retried with credential rotation; only running
    /// out of attempts is an error.
    pub async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        self.retry.run(move |attempt| self.attempt(text, attempt)).await
    }

    /// Translate `text` and split the reply into segments
    pub async fn translate_and_split_lines(&self, text: &str) -> Result<Vec<String>, TranslationError> {
        let translated = self.translate(text).await?;
        Ok(ResponseParser::split_segments(&translated))
    }

    /// Translate one batch of paragraphs into one segment per paragraph
    ///
    /// A count mismatch is retried and, if it persists, reported to the
    /// diagnostic sink; the best candidate is returned either way.
    pub async fn translate_list(&self, paragraphs: &[Paragraph]) -> Result<AlignmentOutcome, TranslationError> {
        let batch = self.builder.build_batch(paragraphs);
        if batch.paragraph_count == 0 {
            return Ok(AlignmentOutcome {
                translations: Vec::new(),
                retry_count: 0,
                expected: 0,
            });
        }

        let started = Instant::now();
        let initial = self.translate_and_split_lines(&batch.text).await?;
        let text = batch.text.as_str();
        let outcome = reconcile(batch.paragraph_count, initial, &self.alignment, move |_| {
            self.translate_and_split_lines(text)
        })
        .await?;

        if outcome.retry_count > 0 {
            write_best_effort(
                self.sinks.mismatch.as_ref(),
                &DiagnosticRecord::RetrySummary {
                    succeeded: outcome.is_aligned(),
                    retry_count: outcome.retry_count,
                    elapsed: started.elapsed(),
                },
            );
        }

        if !outcome.is_aligned() {
            warn!(
                "Batch still misaligned after {} retries: {} paragraphs, {} segments",
                outcome.retry_count,
                outcome.expected,
                outcome.translations.len()
            );
            let pairs = batch
                .source_units()
                .into_iter()
                .enumerate()
                .map(|(i, source)| (source.to_string(), outcome.translations.get(i).cloned()))
                .collect();
            write_best_effort(
                self.sinks.mismatch.as_ref(),
                &DiagnosticRecord::AlignmentMismatch {
                    problem_size: outcome.problem_size(),
                    pairs,
                },
            );
        }

        Ok(outcome)
    }

    /// One remote call: fresh prompt, next credential, classified result
    async fn attempt(&self, text: &str, attempt: usize) -> Result<String, AttemptFailure> {
        let prompt = self.assembler.assemble(text, &self.estimator);
        let api_key = self.credentials.next();

        let (result, truncated) = match classify(self.provider.complete(prompt.into_request(api_key)).await) {
            CallOutcome::Complete(result) => (result, false),
            CallOutcome::TruncatedPartial(result) => {
                warn!("Reply stopped on the length limit; keeping the partial translation");
                write_best_effort(
                    self.sinks.long_text.as_ref(),
                    &DiagnosticRecord::LongText {
                        source: text.to_string(),
                    },
                );
                (result, true)
            }
            CallOutcome::Failed(failure) => return Err(failure),
        };

        self.ledger
            .record(ModelTier::of_served_model(&result.model, &self.routing), result.usage);

        let translated = ResponseParser::combined_text(&result.text);
        if ResponseParser::has_leaked_payload(&translated) {
            // Truncated replies are salvaged, never re-requested
            if attempt == 1 && !truncated {
                return Err(AttemptFailure::malformed("Reply still contains raw structured fields"));
            }
            return Ok(ResponseParser::salvage_leaked(&translated));
        }
        Ok(translated)
    }
}
