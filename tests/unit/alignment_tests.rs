/*!
 * Tests for segment-count reconciliation
 */

use parking_lot::Mutex;
use std::time::Duration;

use paratrans::translation::ReconcilePolicy;
use paratrans::translation::alignment::{accepts, reconcile};

fn segments(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("segment {}", i)).collect()
}

fn policy(max_retries: usize) -> ReconcilePolicy {
    ReconcilePolicy {
        max_retries,
        retry_delay: Duration::ZERO,
    }
}

/// Replay candidate lengths and record every length the reconciler saw
async fn replay(target: usize, initial: usize, lengths: &[usize], max_retries: usize) -> (usize, usize, Vec<usize>) {
    let seen = Mutex::new(Vec::new());
    let seen_ref = &seen;
    let outcome = reconcile(target, segments(initial), &policy(max_retries), move |retry| {
        let len = lengths[retry - 1];
        seen_ref.lock().push(len);
        async move { Ok(segments(len)) }
    })
    .await
    .unwrap();
    (outcome.translations.len(), outcome.retry_count, seen.into_inner())
}

#[tokio::test]
async fn test_reconcile_withLengths2453_shouldEndOnExactMatch() {
    // Initial result has 2 segments; retries return 4, 5, 3
    let (best, retries, seen) = replay(5, 2, &[4, 5, 3], 15).await;
    assert_eq!(best, 5);
    assert_eq!(retries, 2);
    assert_eq!(seen, vec![4, 5]);
}

#[tokio::test]
async fn test_reconcile_afterImprovement_shouldNeverRegress() {
    let (best, retries, _) = replay(5, 2, &[4, 3, 2, 1], 4).await;
    assert_eq!(best, 4);
    assert_eq!(retries, 4);
}

#[tokio::test]
async fn test_reconcile_fromOvershoot_shouldComeDown() {
    let (best, _, _) = replay(3, 6, &[5, 7, 4, 3], 15).await;
    assert_eq!(best, 3);
}

#[test]
fn test_reconcile_withZeroRetries_shouldReturnInitial() {
    let outcome = tokio_test::block_on(async {
        reconcile(4, segments(2), &policy(0), |_| async { Ok(segments(4)) }).await
    })
    .unwrap();
    assert!(!outcome.is_aligned());
    assert_eq!(outcome.retry_count, 0);
    assert_eq!(outcome.problem_size(), 2);
}

#[test]
fn test_accepts_overshootingCandidateAfterUndershoot_shouldBeRejected() {
    assert!(!accepts(3, 8, 5));
    assert!(accepts(3, 5, 5));
}
