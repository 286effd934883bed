/*!
 * Reply parsing.
 *
 * A reply is first searched for the improved-translation field of the
 * structured two-pass format. When that field cannot be found, the whole
 * reply is used as the combined translation. The combined text is then split
 * into one segment per non-blank line, with any ordinal marker the service
 * reintroduced removed.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Improved-translation field, tolerant of curly quotes and trailing commas.
/// A reply cut off by the length limit may end inside the field.
static FINAL_TRANSLATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""better_translation":[\s\n]*[“"”]([\s\S]*?)(?:[“"”]?,?[\s\n]*\}|[“"”]?,?[\s\n]*$)"#)
        .expect("valid regex")
});

/// Quote and bracket debris left around a salvaged field value
const FIELD_DEBRIS: &[char] = &['"', '“', '”', ',', '}', ']', '[', '{'];

/// `(n)`, `n.` or a bare `n` followed by whitespace
static ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\(\d+\)|\d+\.|\d+(?:\s|$))\s*").expect("valid regex"));

/// Raw key that shows the structured format leaked into the parsed text
const LEAKED_FIELD: &str = "\"direct_translation\":";
/// Key suffix shared by both structured fields
const FIELD_SUFFIX: &str = "_translation\":";

/// Stateless reply parser
pub struct ResponseParser;

impl ResponseParser {
    /// Captured improved-translation field, if the reply is structured
    pub fn extract_final_translation(reply: &str) -> Option<String> {
        FINAL_TRANSLATION
            .captures(reply)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Combined translated text of a reply
    ///
    /// Falls back to the raw reply when no structured field is found.
    /// Escaped `\n` sequences become real line breaks.
    pub fn combined_text(reply: &str) -> String {
        let text = match Self::extract_final_translation(reply) {
            Some(field) => field,
            None => {
                debug!("No structured translation field in reply, using raw text");
                reply.to_string()
            }
        };
        text.replace("\\n", "\n")
    }

    /// Whether raw structured-format keys survived extraction
    pub fn has_leaked_payload(text: &str) -> bool {
        text.contains(LEAKED_FIELD)
    }

    /// Keep only the value that follows the last structured-format key
    pub fn salvage_leaked(text: &str) -> String {
        match text.rfind(FIELD_SUFFIX) {
            Some(pos) => text[pos + FIELD_SUFFIX.len()..]
                .trim()
                .trim_matches(FIELD_DEBRIS)
                .trim()
                .to_string(),
            None => text.to_string(),
        }
    }

    /// Remove leading ordinal markers
    ///
    /// Markers are removed repeatedly as long as some text remains after
    /// them, so a segment that is only a number is left alone and stripping
    /// is idempotent.
    pub fn strip_ordinal(line: &str) -> &str {
        let mut current = line.trim();
        while let Some(m) = ORDINAL.find(current) {
            let rest = current[m.end()..].trim();
            // "3.5 apples" is a number, not a marker
            let decimal = m.as_str().trim_end().ends_with('.') && rest.starts_with(|c: char| c.is_ascii_digit());
            if rest.is_empty() || decimal {
                break;
            }
            current = rest;
        }
        current
    }

    /// Split combined text into cleaned segments
    pub fn split_segments(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| Self::strip_ordinal(line).to_string())
            .collect()
    }

    /// Parse a reply into ordered segments
    pub fn parse(reply: &str) -> Vec<String> {
        Self::split_segments(&Self::combined_text(reply))
    }
}
