/*!
 * Batch translation processing.
 *
 * This module translates independent batches of paragraphs concurrently,
 * with a bound on in-flight batches, progress reporting and an optional
 * per-batch deadline. Results come back in batch order.
 */

use futures::stream::{self, StreamExt};
use log::{debug, error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

use crate::app_config::TranslationConfig;
use crate::errors::TranslationError;

use super::alignment::AlignmentOutcome;
use super::core::TranslationService;
use super::document::Paragraph;

/// Batch translator for processing paragraph batches concurrently
pub struct BatchTranslator {
    /// The translation service to use
    service: TranslationService,

    /// Maximum number of concurrent batches
    max_concurrent_requests: usize,

    /// Optional deadline per batch, in seconds
    batch_timeout_secs: Option<u64>,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(service: TranslationService, max_concurrent_requests: usize) -> Self {
        Self {
            service,
            max_concurrent_requests: max_concurrent_requests.max(1),
            batch_timeout_secs: None,
        }
    }

    /// Create a batch translator with the concurrency and deadline of `config`
    pub fn from_config(service: TranslationService, config: &TranslationConfig) -> Self {
        Self::new(service, config.concurrent_requests).with_batch_timeout(config.retry.batch_timeout_secs)
    }

    /// Set the per-batch deadline
    pub fn with_batch_timeout(mut self, secs: Option<u64>) -> Self {
        self.batch_timeout_secs = secs;
        self
    }

    /// The underlying service
    pub fn service(&self) -> &TranslationService {
        &self.service
    }

    /// Translate `batches`, returning one result per batch in input order
    ///
    /// A failed batch does not stop the others; the caller decides whether to
    /// skip it or halt.
    pub async fn translate_batches(
        &self,
        batches: &[Vec<Paragraph>],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Vec<Result<AlignmentOutcome, TranslationError>> {
        // Create a semaphore to limit concurrent requests
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_requests));

        // Track progress
        let total_batches = batches.len();
        let processed_batches = Arc::new(AtomicUsize::new(0));

        let mut results = stream::iter(batches.iter().enumerate())
            .map(|(batch_index, batch)| {
                let service = self.service.clone();
                let semaphore = semaphore.clone();
                let processed_batches = processed_batches.clone();
                let progress_callback = progress_callback.clone();
                let timeout_secs = self.batch_timeout_secs;

                async move {
                    // The semaphore is never closed
                    let _permit = semaphore.acquire().await.ok();
                    debug!("Processing batch {} of {}", batch_index + 1, total_batches);

                    let start_time = Instant::now();
                    let result = match timeout_secs {
                        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), service.translate_list(batch))
                            .await
                            .unwrap_or(Err(TranslationError::Timeout {
                                batch: batch_index,
                                secs,
                            })),
                        None => service.translate_list(batch).await,
                    };

                    let current = processed_batches.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_batches);

                    match &result {
                        Ok(outcome) => debug!(
                            "Batch {} completed in {:?} ({} retries)",
                            batch_index + 1,
                            start_time.elapsed(),
                            outcome.retry_count
                        ),
                        Err(e) => error!("Batch {} failed: {}", batch_index + 1, e),
                    }

                    (batch_index, result)
                }
            })
            .buffer_unordered(self.max_concurrent_requests)
            .collect::<Vec<_>>()
            .await;

        // Sort results by batch index to maintain original order
        results.sort_by_key(|(idx, _)| *idx);
        results.into_iter().map(|(_, result)| result).collect()
    }
}
