/*!
 * Language utilities for turning the configured target language into the
 * English name used inside prompts.
 *
 * ISO 639-1 (2-letter), ISO 639-2/T and the common ISO 639-2/B codes are
 * resolved through isolang; script-qualified Chinese codes have dedicated
 * names. Anything else is used verbatim as a language name, unless it holds
 * digits or no letters at all.
 */

use anyhow::{anyhow, Result};
use isolang::Language;

/// Map an ISO 639-2/B code to its ISO 639-2/T equivalent
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    let part2t = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(part2t)
}

/// Resolve an ISO code to an isolang language
fn language_from_code(code: &str) -> Option<Language> {
    match code.len() {
        2 => Language::from_639_1(code),
        3 => Language::from_639_3(part2b_to_part2t(code).unwrap_or(code)),
        _ => None,
    }
}

/// Get the English language name for a code or name
///
/// # Examples
/// `"fr"` → `"French"`, `"zh-hant"` → `"Traditional Chinese"`,
/// `"Klingon"` → `"Klingon"`.
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(anyhow!("Target language cannot be empty"));
    }

    match normalized.as_str() {
        "zh-hans" | "zh-cn" | "zh" => return Ok("Simplified Chinese".to_string()),
        "zh-hant" | "zh-tw" => return Ok("Traditional Chinese".to_string()),
        "zh-yue" => return Ok("Cantonese".to_string()),
        _ => {}
    }

    if let Some(lang) = language_from_code(&normalized) {
        return Ok(lang.to_name().to_string());
    }

    // Not a code: accept names as given, but never bare numbers or codes with digits
    if normalized.chars().any(char::is_alphabetic) && !normalized.chars().any(|c| c.is_ascii_digit()) {
        return Ok(code.trim().to_string());
    }

    Err(anyhow!("Invalid language code: {}", code))
}
