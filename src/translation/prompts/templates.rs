/*!
 * Prompt templates for paragraph translation.
 *
 * Two layouts are supported. The two-pass layout asks the service for a
 * direct translation and an improved one in a small structured reply, and
 * the pipeline keeps only the improved field. The template layout sends a
 * single user message rendered from a configurable template.
 */

/// User/system message template with `{text}`, `{language}` and `{crlf}` placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default user template for the single-message layout.
    pub const DEFAULT_USER: &'static str = "Please help me to translate,`{text}` to {language}, please return only translated content not include the origin text";

    /// System message of the two-pass layout.
    pub const TWO_PASS_SYSTEM: &'static str =
        "You are a professional translator. You always translate accurately, fluently and reliably.";

    /// Guideline turn of the two-pass layout.
    pub const TWO_PASS_GUIDELINE: &'static str = r#"
Translation Guideline:
- Retain specific terms/names, put it after the translation in brackets, for example: "乔（Joe）".
- Divide the translation into two parts and print each result:
1. Translate directly based on the content, without omitting any information.
2. Based on the first direct translation, rephrase it to make the content more easily understood and conform to {language} expression habits, while adhering to the original meaning.
Without any comment, return the result in the following python dict format:
[{"direct_translation": "direct translation here",
"better_translation": "better translation here",}]
Reply OK to this message and I'll send you text to be translated to {language} afterwards."#;

    /// Assistant acknowledgment of the guideline turn.
    pub const ACKNOWLEDGMENT: &'static str = "OK";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default single-message user template.
    pub fn default_user() -> Self {
        Self::new(Self::DEFAULT_USER)
    }

    /// Create the two-pass guideline template.
    pub fn two_pass_guideline() -> Self {
        Self::new(Self::TWO_PASS_GUIDELINE)
    }

    /// Render the template.
    ///
    /// `{text}` is substituted last so placeholders inside the text itself
    /// are left alone.
    pub fn render(&self, text: &str, language: &str) -> String {
        self.template
            .replace("{language}", language)
            .replace("{crlf}", "\n")
            .replace("{text}", text)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::default_user()
    }
}

/// Final user turn of the two-pass layout
pub fn two_pass_payload(text: &str, language: &str) -> String {
    format!("{{\"text\": \"{}\",\"target_language\": \"{}\",}}", text, language)
}
