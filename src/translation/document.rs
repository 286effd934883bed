/*!
 * Paragraph and batch model.
 *
 * A paragraph is identified by its 1-based position in the source document.
 * Batches are contiguous, ordered slices of paragraphs.
 */

use serde::{Deserialize, Serialize};

/// One text unit of the source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// 1-based position in the source document
    pub index: usize,
    /// Raw text, possibly carrying inline annotation markup
    pub text: String,
}

impl Paragraph {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self { index, text: text.into() }
    }
}

/// Number a list of texts as paragraphs, starting at 1
pub fn paragraphs_from_texts<I, S>(texts: I) -> Vec<Paragraph>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| Paragraph::new(i + 1, text))
        .collect()
}

/// Split plain text into paragraphs on blank lines
///
/// Stand-in for real document extraction: each run of non-blank lines
/// becomes one paragraph, soft wraps included.
pub fn paragraphs_from_plain_text(text: &str) -> Vec<Paragraph> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    paragraphs_from_texts(blocks)
}

/// Group paragraphs into ordered batches of at most `batch_size`
pub fn split_into_batches(paragraphs: &[Paragraph], batch_size: usize) -> Vec<Vec<Paragraph>> {
    paragraphs
        .chunks(batch_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}
