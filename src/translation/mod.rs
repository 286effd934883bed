/*!
 * Batch paragraph translation.
 *
 * This module turns an ordered paragraph list into an aligned list of
 * translations. It is split into several submodules:
 *
 * - `document`: Paragraph and batch model
 * - `prompts`: Batch text assembly, message templates and prompt routing
 * - `tokens`: Token estimation and model tier selection
 * - `credentials`: Round-robin credential rotation
 * - `retry`: Call classification and the per-call attempt loop
 * - `parser`: Reply parsing into per-paragraph segments
 * - `alignment`: Segment-count reconciliation
 * - `ledger`: Cost accounting
 * - `diagnostics`: Append-only diagnostic sinks
 * - `core`: Batch-level translation service
 * - `batch`: Concurrent processing of independent batches
 */

// Re-export main types for easier usage
pub use self::alignment::{AlignmentOutcome, ReconcilePolicy};
pub use self::batch::BatchTranslator;
pub use self::core::TranslationService;
pub use self::credentials::CredentialRotator;
pub use self::diagnostics::{DiagnosticRecord, DiagnosticSink, DiagnosticSinks, FileSink, MemorySink, NullSink};
pub use self::document::{Paragraph, paragraphs_from_plain_text, paragraphs_from_texts, split_into_batches};
pub use self::ledger::{CostLedger, CostTotals};
pub use self::parser::ResponseParser;
pub use self::prompts::{BatchText, Prompt, PromptAssembler, PromptTemplate, RequestBuilder};
pub use self::retry::{CallOutcome, CompletionResult, RetryController, RetryDecision};
pub use self::tokens::{ModelTier, TokenEstimator};

// Submodules
pub mod alignment;
pub mod batch;
pub mod core;
pub mod credentials;
pub mod diagnostics;
pub mod document;
pub mod ledger;
pub mod parser;
pub mod prompts;
pub mod retry;
pub mod tokens;
