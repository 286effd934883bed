/*!
 * Batch text assembly.
 *
 * Paragraphs of a batch are numbered `(i)`, stripped of inline annotation
 * markup and joined with a long run of newlines. Soft wraps inside a
 * paragraph are collapsed so that the reply can be split line by line.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::translation::document::Paragraph;

/// Separator between paragraphs; never produced by translated prose
pub const DEFAULT_SEPARATOR: &str = "\n\n\n\n\n";

static SUPERSCRIPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<sup\b[^>]*>.*?</sup>").expect("valid regex"));
static FOOTNOTE_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\^[^\]\s]*\]").expect("valid regex"));

/// Combined text of one batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchText {
    /// Numbered, joined paragraphs
    pub text: String,
    /// Number of paragraphs in the batch
    pub paragraph_count: usize,
    /// Separator used between paragraphs
    pub separator: String,
}

impl BatchText {
    /// The numbered source paragraphs, in order
    pub fn source_units(&self) -> Vec<&str> {
        self.text.split(self.separator.as_str()).collect()
    }
}

/// Builds the combined text of a batch
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    separator: String,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }

    pub fn with_separator(separator: &str) -> Self {
        Self {
            separator: separator.to_string(),
        }
    }

    /// Number, clean and join `paragraphs`
    pub fn build_batch(&self, paragraphs: &[Paragraph]) -> BatchText {
        let numbered: Vec<String> = paragraphs
            .iter()
            .enumerate()
            .map(|(i, p)| format!("({}) {}", i + 1, strip_annotations(&p.text).trim()))
            .collect();

        BatchText {
            text: join_lines(&numbered.join(&self.separator)),
            paragraph_count: paragraphs.len(),
            separator: self.separator.clone(),
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove footnote markers: `<sup>…</sup>` elements and `[^n]` references
pub fn strip_annotations(text: &str) -> String {
    let without_sup = SUPERSCRIPT.replace_all(text, "");
    FOOTNOTE_REF.replace_all(&without_sup, "").into_owned()
}

/// Join soft-wrapped lines with spaces, keeping blank lines
///
/// A literal `^M` marks a carriage return; lines left holding only a carriage
/// return are dropped.
pub fn join_lines(text: &str) -> String {
    let mut new_lines: Vec<String> = Vec::new();
    let mut wrapped: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !wrapped.is_empty() {
                new_lines.push(wrapped.join(" "));
                wrapped.clear();
            }
            new_lines.push(line.to_string());
        } else {
            wrapped.push(trimmed);
        }
    }
    if !wrapped.is_empty() {
        new_lines.push(wrapped.join(" "));
    }

    new_lines
        .join("\n")
        .replace("^M", "\r")
        .split('\n')
        .filter(|line| line.trim_matches(|c| c == ' ' || c == '\t') != "\r")
        .collect::<Vec<_>>()
        .join("\n")
}
