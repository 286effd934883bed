/*!
 * Tests for batch text assembly and prompt routing
 */

use paratrans::app_config::{PromptStyle, TranslationConfig};
use paratrans::providers::Role;
use paratrans::translation::prompts::{DEFAULT_SEPARATOR, PromptAssembler, RequestBuilder};
use paratrans::translation::{ModelTier, Paragraph, TokenEstimator, paragraphs_from_texts};

#[test]
fn test_buildBatch_withAnnotatedParagraphs_shouldStripMarkupAndNumber() {
    let paragraphs = paragraphs_from_texts([
        "First<sup><a href=\"#n1\">1</a></sup> paragraph.",
        "Second[^2] one,\nwrapped over\nthree lines.",
        "Third.",
    ]);

    let batch = RequestBuilder::new().build_batch(&paragraphs);

    assert_eq!(batch.paragraph_count, 3);
    assert_eq!(
        batch.source_units(),
        vec![
            "(1) First paragraph.",
            "(2) Second one, wrapped over three lines.",
            "(3) Third."
        ]
    );
    assert_eq!(batch.text.matches(DEFAULT_SEPARATOR).count(), 2);
}

#[test]
fn test_buildBatch_shouldNumberWithinBatchRegardlessOfDocumentIndex() {
    let paragraphs = vec![Paragraph::new(41, "a"), Paragraph::new(42, "b")];
    let batch = RequestBuilder::new().build_batch(&paragraphs);
    assert_eq!(batch.source_units(), vec!["(1) a", "(2) b"]);
}

#[test]
fn test_buildBatch_withCustomSeparator_shouldUseIt() {
    let batch = RequestBuilder::with_separator("\n\n\n").build_batch(&paragraphs_from_texts(["x", "y"]));
    assert_eq!(batch.text, "(1) x\n\n\n(2) y");
}

#[test]
fn test_assemble_shouldBeDeterministicForIdenticalInput() {
    let config = TranslationConfig {
        api_keys: vec!["k".into()],
        ..Default::default()
    };
    let assembler = PromptAssembler::new(&config, "Simplified Chinese");
    let estimator = TokenEstimator::new(&config.routing.tokenizer_model).unwrap();

    let first = assembler.assemble("(1) Hello", &estimator);
    let second = assembler.assemble("(1) Hello", &estimator);
    assert_eq!(first, second);
    assert_eq!(first.tier, Some(ModelTier::Standard));
}

#[test]
fn test_assemble_templateStyleWithSystemMessage_shouldPrependIt() {
    let mut config = TranslationConfig {
        api_keys: vec!["k".into()],
        ..Default::default()
    };
    config.prompt.style = PromptStyle::Template;
    config.prompt.system_template = Some("You translate into {language}.".into());
    config.temperature = 0.3;
    let assembler = PromptAssembler::new(&config, "German");
    let estimator = TokenEstimator::new("gpt-3.5-turbo").unwrap();

    let prompt = assembler.assemble("(1) Hi", &estimator);

    assert_eq!(prompt.messages.len(), 2);
    assert_eq!(prompt.messages[0].role, Role::System);
    assert_eq!(prompt.messages[0].content, "You translate into German.");
    assert!(prompt.messages[1].content.contains("`(1) Hi`"));
    assert_eq!(prompt.temperature, 0.3);
}
