/*!
 * Integration tests for concurrent batch translation
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use paratrans::errors::TranslationError;
use paratrans::providers::mock::{MockFailure, MockProvider, MockReply};
use paratrans::translation::{BatchTranslator, paragraphs_from_plain_text, split_into_batches};

use crate::common::{sample_paragraphs, service_with, test_config};

#[tokio::test]
async fn test_translateBatches_withManyConcurrentBatches_shouldKeepDocumentOrder() {
    let provider = MockProvider::working();
    let (service, _) = service_with(&provider, &test_config(&["a", "b", "c"]));
    let paragraphs = sample_paragraphs(23);
    let batches = split_into_batches(&paragraphs, 4);
    let translator = BatchTranslator::new(service, 4);

    let results = translator.translate_batches(&batches, |_, _| {}).await;

    assert_eq!(results.len(), 6);
    let translated: Vec<String> = results
        .into_iter()
        .flat_map(|r| r.unwrap().translations)
        .collect();
    let expected: Vec<String> = paragraphs.iter().map(|p| format!("[TRANSLATED] {}", p.text)).collect();
    assert_eq!(translated, expected);
    assert_eq!(provider.call_count(), 6);
}

#[tokio::test]
async fn test_translateBatches_withOneFailingBatch_shouldKeepTheOthers() {
    let provider = MockProvider::scripted(vec![
        MockReply::Fail(MockFailure::Connection),
        MockReply::Fail(MockFailure::RateLimit),
        MockReply::Fail(MockFailure::Api(502)),
    ]);
    let (service, _) = service_with(&provider, &test_config(&["k"]));
    let batches = split_into_batches(&sample_paragraphs(6), 2);
    let translator = BatchTranslator::new(service, 1);

    let results = translator.translate_batches(&batches, |_, _| {}).await;

    assert!(matches!(
        results[0],
        Err(TranslationError::ExhaustedRetries { attempts: 3, .. })
    ));
    assert!(results[1].as_ref().unwrap().is_aligned());
    assert!(results[2].as_ref().unwrap().is_aligned());
}

#[tokio::test]
async fn test_translateBatches_acrossBatches_shouldShareLedger() {
    let provider = MockProvider::working();
    let (service, _) = service_with(&provider, &test_config(&["k"]));
    let batches = split_into_batches(&sample_paragraphs(9), 3);
    let translator = BatchTranslator::new(service, 3);

    translator.translate_batches(&batches, |_, _| {}).await;

    // Mock usage is 10 prompt and 10 completion tokens per call at standard rates
    let totals = translator.service().ledger().totals();
    assert_eq!(totals.prompt, 3.0 * 10.0 * 1.5);
    assert_eq!(totals.completion, 3.0 * 10.0 * 2.0);
}

#[tokio::test]
async fn test_translateBatches_progress_shouldCountUpToTotal() {
    let provider = MockProvider::working();
    let (service, _) = service_with(&provider, &test_config(&["k"]));
    let batches = split_into_batches(&sample_paragraphs(10), 2);
    let translator = BatchTranslator::new(service, 2);
    let highest = Arc::new(AtomicUsize::new(0));
    let seen = highest.clone();

    translator
        .translate_batches(&batches, move |current, total| {
            assert!(current <= total);
            seen.fetch_max(current, Ordering::SeqCst);
        })
        .await;

    assert_eq!(highest.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_translateBatches_pastDeadline_shouldReportTimeout() {
    let mut config = test_config(&["k"]);
    config.retry.alignment_retry_delay_secs = 5;
    let provider = MockProvider::scripted(vec![MockReply::Text(MockProvider::numbered_reply(&["merged"]))]);
    let (service, _) = service_with(&provider, &config);
    let batches = vec![sample_paragraphs(2)];
    let translator = BatchTranslator::new(service, 1).with_batch_timeout(Some(1));

    let results = translator.translate_batches(&batches, |_, _| {}).await;

    assert!(matches!(results[0], Err(TranslationError::Timeout { batch: 0, secs: 1 })));
}

#[test]
fn test_paragraphsFromPlainText_thenBatches_shouldCoverEveryParagraph() {
    let text = "First paragraph\nwrapped here.\n\nSecond one.\n\n\nThird.\n";
    let paragraphs = paragraphs_from_plain_text(text);
    let batches = split_into_batches(&paragraphs, 2);

    assert_eq!(paragraphs.len(), 3);
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1][0].text, "Third.");
}
