/*!
 * Segment-count reconciliation.
 *
 * The service may merge paragraphs (too few segments) or split them (too
 * many). When a parsed reply does not hold exactly one segment per
 * paragraph, the whole batch is re-translated a bounded number of times and
 * the best candidate so far is kept. A candidate replaces the best when it
 * hits the target, climbs towards it from below without overshooting, or
 * comes down while the best overshoots. The rule is a heuristic; an exact
 * match always wins.
 */

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

use crate::errors::TranslationError;

/// Bounds of the re-translation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilePolicy {
    /// Re-translations allowed after the initial attempt
    pub max_retries: usize,
    /// Pause before each re-translation
    pub retry_delay: Duration,
}

/// Final result of reconciling one batch
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutcome {
    /// Best segment list found, in paragraph order
    pub translations: Vec<String>,
    /// Re-translations performed
    pub retry_count: usize,
    /// Number of paragraphs in the batch
    pub expected: usize,
}

impl AlignmentOutcome {
    /// Whether there is exactly one segment per paragraph
    pub fn is_aligned(&self) -> bool {
        self.translations.len() == self.expected
    }

    /// Paragraph count minus segment count
    pub fn problem_size(&self) -> i64 {
        self.expected as i64 - self.translations.len() as i64
    }
}

/// Whether a candidate of `candidate_len` segments replaces the best so far
pub fn accepts(best_len: usize, candidate_len: usize, target: usize) -> bool {
    candidate_len == target
        || (best_len < candidate_len && candidate_len <= target)
        || (candidate_len < best_len && best_len > target)
}

/// Re-translate until the segment count matches `target` or retries run out
///
/// `attempt` receives the 1-based retry number and returns a freshly parsed
/// segment list. An error from `attempt` means the remote call itself was
/// exhausted and ends reconciliation.
pub async fn reconcile<F, Fut>(
    target: usize,
    initial: Vec<String>,
    policy: &ReconcilePolicy,
    mut attempt: F,
) -> Result<AlignmentOutcome, TranslationError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<String>, TranslationError>>,
{
    let mut best = initial;
    let mut retry_count = 0;

    while best.len() != target && retry_count < policy.max_retries {
        retry_count += 1;
        warn!(
            "Expected {} segments but have {}; retry {}/{}",
            target,
            best.len(),
            retry_count,
            policy.max_retries
        );
        if !policy.retry_delay.is_zero() {
            tokio::time::sleep(policy.retry_delay).await;
        }

        let candidate = attempt(retry_count).await?;
        if accepts(best.len(), candidate.len(), target) {
            debug!("Accepted candidate with {} segments", candidate.len());
            best = candidate;
        }
    }

    Ok(AlignmentOutcome {
        translations: best,
        retry_count,
        expected: target,
    })
}
