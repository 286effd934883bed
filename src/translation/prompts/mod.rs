/*!
 * Prompt construction for batch translation.
 *
 * This module provides:
 * - Batch text assembly (numbering, annotation stripping, line joining)
 * - Message templates for the supported prompt layouts
 * - Prompt assembly with token-based model routing
 */

pub mod assembler;
pub mod builder;
pub mod templates;

// Re-export main types
pub use assembler::{Prompt, PromptAssembler};
pub use builder::{join_lines, strip_annotations, BatchText, RequestBuilder, DEFAULT_SEPARATOR};
pub use templates::PromptTemplate;
