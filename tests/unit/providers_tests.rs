/*!
 * Tests for provider implementations
 */

use paratrans::errors::ProviderError;
use paratrans::providers::mock::{MockFailure, MockProvider, MockReply};
use paratrans::providers::openai::{OpenAI, OpenAIResponse};
use paratrans::providers::{ChatMessage, CompletionRequest, FinishReason, Provider, TokenUsage};

fn request(model: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user("(1) Hello")],
        temperature: 1.0,
        deployment_id: None,
        api_key: "key".to_string(),
    }
}

#[tokio::test]
async fn test_mockProvider_withServedModel_shouldReportIt() {
    let provider = MockProvider::working().with_served_model("gpt-3.5-turbo-16k-0613");
    let response = provider.complete(request("gpt-3.5-turbo")).await.unwrap();
    assert_eq!(response.model, "gpt-3.5-turbo-16k-0613");
}

#[tokio::test]
async fn test_mockProvider_withoutUsage_shouldOmitIt() {
    let provider = MockProvider::working().with_usage(None);
    let response = provider.complete(request("m")).await.unwrap();
    assert_eq!(response.usage, None);
}

#[tokio::test]
async fn test_mockProvider_scriptedFailures_shouldMapToProviderErrors() {
    let provider = MockProvider::scripted(vec![
        MockReply::Fail(MockFailure::RateLimit),
        MockReply::Fail(MockFailure::Api(500)),
        MockReply::LengthTruncated("(1) Bon".into()),
    ]);

    assert!(matches!(
        provider.complete(request("m")).await,
        Err(ProviderError::RateLimitExceeded(_))
    ));
    assert!(matches!(
        provider.complete(request("m")).await,
        Err(ProviderError::ApiError { status_code: 500, .. })
    ));
    let truncated = provider.complete(request("m")).await.unwrap();
    assert_eq!(truncated.choices[0].finish_reason, FinishReason::LengthTruncated);
    assert_eq!(provider.call_count(), 3);
}

#[test]
fn test_openAIResponse_fromJson_shouldConvertToCompletion() {
    let body = r#"{
        "model": "gpt-3.5-turbo-0613",
        "choices": [
            {"message": {"role": "assistant", "content": "(1) Bonjour"}, "finish_reason": "stop"}
        ],
        "usage": {"prompt_tokens": 20, "completion_tokens": 5, "total_tokens": 25}
    }"#;

    let response: OpenAIResponse = serde_json::from_str(body).unwrap();
    let completion = response.into_completion("gpt-3.5-turbo");

    assert_eq!(completion.model, "gpt-3.5-turbo-0613");
    assert_eq!(completion.choices[0].content, "(1) Bonjour");
    assert_eq!(completion.choices[0].finish_reason, FinishReason::Complete);
    assert_eq!(
        completion.usage,
        Some(TokenUsage {
            prompt_tokens: 20,
            completion_tokens: 5
        })
    );
}

#[test]
fn test_openAI_new_shouldRejectMalformedEndpoint() {
    assert!(OpenAI::new("://nope", "2023-03-15-preview", 30).is_err());
    assert!(OpenAI::new("https://example.openai.azure.com", "2023-03-15-preview", 30).is_ok());
}
