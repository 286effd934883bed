/*!
 * Common test utilities for the paratrans test suite
 */

use std::sync::Arc;

use paratrans::app_config::TranslationConfig;
use paratrans::providers::mock::MockProvider;
use paratrans::translation::{DiagnosticSinks, MemorySink, Paragraph, TranslationService, paragraphs_from_texts};

/// Translation settings with the given keys and no waiting between retries
pub fn test_config(keys: &[&str]) -> TranslationConfig {
    let mut config = TranslationConfig {
        api_keys: keys.iter().map(|k| k.to_string()).collect(),
        ..Default::default()
    };
    config.retry.rate_window_secs = 0;
    config.retry.alignment_retry_delay_secs = 0;
    config
}

/// Route library logs to the test harness output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Sinks that keep records in memory, one per destination
#[derive(Debug, Clone, Default)]
pub struct RecordingSinks {
    pub mismatch: MemorySink,
    pub long_text: MemorySink,
}

impl RecordingSinks {
    pub fn sinks(&self) -> DiagnosticSinks {
        DiagnosticSinks {
            mismatch: Arc::new(self.mismatch.clone()),
            long_text: Arc::new(self.long_text.clone()),
        }
    }
}

/// A French translation service over `provider` recording its diagnostics
pub fn service_with(provider: &MockProvider, config: &TranslationConfig) -> (TranslationService, RecordingSinks) {
    init_logging();
    let recording = RecordingSinks::default();
    let service = TranslationService::new(config, "French", Arc::new(provider.clone()))
        .expect("valid test configuration")
        .with_sinks(recording.sinks());
    (service, recording)
}

/// `count` short numbered paragraphs
pub fn sample_paragraphs(count: usize) -> Vec<Paragraph> {
    paragraphs_from_texts((1..=count).map(|i| format!("Paragraph number {}.", i)))
}
