/*!
 * # paratrans - batch paragraph translation with a remote completion service
 *
 * A Rust library that translates a document's paragraphs in batches and
 * guarantees, as far as the service allows, one translation per paragraph.
 *
 * ## Features
 *
 * - Numbered batch prompts with a separator the service does not produce
 * - Token-based routing between a standard and a long-context model
 * - Round-robin credential rotation on every attempt
 * - Bounded retries with backoff spread over the credential pool
 * - Tolerant parsing of structured and plain replies
 * - Hill-climbing reconciliation of the segment count
 * - Cost accounting from reported token usage
 * - Concurrent translation of independent batches
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Batching, prompting, parsing, reconciliation and accounting
 * - `providers`: Completion service clients:
 *   - `providers::openai`: OpenAI-compatible chat completion client
 *   - `providers::mock`: Scripted in-process provider
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{ProviderError, TranslationError};
pub use language_utils::get_language_name;
pub use translation::{AlignmentOutcome, BatchTranslator, Paragraph, TranslationService};
