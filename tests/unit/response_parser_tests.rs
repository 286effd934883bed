/*!
 * Tests for reply parsing
 */

use paratrans::providers::mock::MockProvider;
use paratrans::translation::ResponseParser;

#[test]
fn test_stripOrdinal_withEachMarkerForm_shouldNormalize() {
    for input in ["(3) hello", "3. hello", "3 hello"] {
        assert_eq!(ResponseParser::strip_ordinal(input), "hello", "input: {:?}", input);
    }
}

#[test]
fn test_parse_structuredReplyWithEscapedNewlines_shouldSplitSegments() {
    let reply = MockProvider::structured_reply("(1) direct\\n(2) direct", "(1) Premier\\n(2) Second");
    assert_eq!(ResponseParser::parse(&reply), vec!["Premier", "Second"]);
}

#[test]
fn test_parse_replyWithoutStructuredField_shouldUseRawText() {
    let reply = "Here you go:\n\n(1) Premier\n(2) Second";
    assert_eq!(ResponseParser::parse(reply), vec!["Here you go:", "Premier", "Second"]);
}

#[test]
fn test_parse_withBlankLinesAndIndentation_shouldDropBlanks() {
    let reply = "\n\n   (1) Premier   \n\n\n\n\n(2) Second\n   \n";
    assert_eq!(ResponseParser::parse(reply), vec!["Premier", "Second"]);
}

#[test]
fn test_parse_reparsingOutput_shouldBeNoOp() {
    let replies = [
        MockProvider::structured_reply("x", "(1) 1. Un\\n2 Deux\\n(3) 3"),
        "1. Alpha\n\n2. Beta\n(3) 3.14 is pi".to_string(),
        "no numbering at all".to_string(),
    ];
    for reply in replies {
        let parsed = ResponseParser::parse(&reply);
        assert_eq!(ResponseParser::parse(&parsed.join("\n")), parsed);
        assert_eq!(ResponseParser::split_segments(&parsed.join("\n")), parsed);
    }
}

#[test]
fn test_extractFinalTranslation_withoutField_shouldReturnNone() {
    assert_eq!(ResponseParser::extract_final_translation("(1) plain"), None);
}
