/*!
 * Tests for credential rotation and cost accounting
 */

use std::sync::Arc;

use paratrans::app_config::{ModelRate, PricingConfig};
use paratrans::errors::TranslationError;
use paratrans::providers::TokenUsage;
use paratrans::translation::{CostLedger, CredentialRotator, ModelTier};

#[test]
fn test_costLedger_longContextUsage_shouldAddPromptAndCompletionRates() {
    let ledger = CostLedger::default();

    let added = ledger.record(
        ModelTier::LongContext,
        TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 50,
        },
    );

    assert_eq!(added.prompt, 300.0);
    assert_eq!(added.completion, 200.0);
    assert_eq!(ledger.totals().total(), 100.0 * 3.0 + 50.0 * 4.0);
}

#[test]
fn test_costLedger_repeatedCalls_shouldBeStrictlyAdditive() {
    let ledger = CostLedger::default();
    let usage = TokenUsage {
        prompt_tokens: 100,
        completion_tokens: 50,
    };

    let mut previous = 0.0;
    for _ in 0..5 {
        ledger.record(ModelTier::Standard, usage);
        let total = ledger.totals().total();
        assert!(total > previous);
        previous = total;
    }
    assert_eq!(previous, 5.0 * (100.0 * 1.5 + 50.0 * 2.0));
}

#[test]
fn test_costLedger_customPricing_shouldReportDollars() {
    let ledger = CostLedger::new(PricingConfig {
        standard: ModelRate {
            prompt_per_million: 2.0,
            completion_per_million: 2.0,
        },
        long_context: ModelRate {
            prompt_per_million: 4.0,
            completion_per_million: 4.0,
        },
    });

    ledger.record(
        ModelTier::Standard,
        TokenUsage {
            prompt_tokens: 500_000,
            completion_tokens: 0,
        },
    );

    assert_eq!(ledger.prompt_cost(), 1.0);
    assert_eq!(ledger.completion_cost(), 0.0);
    assert_eq!(ledger.total_cost(), 1.0);
    assert!(ledger.summary().contains("Total spent: $1.000000"));
}

#[tokio::test]
async fn test_costLedger_concurrentRecords_shouldNotLoseUpdates() {
    let ledger = Arc::new(CostLedger::default());
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    ledger.record(
                        ModelTier::Standard,
                        TokenUsage {
                            prompt_tokens: 2,
                            completion_tokens: 1,
                        },
                    );
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(ledger.totals().prompt, 800.0 * 2.0 * 1.5);
}

#[test]
fn test_credentialRotator_shouldWrapAroundPool() {
    let rotator = CredentialRotator::new(vec!["k1".into(), "k2".into()]).unwrap();
    assert_eq!(rotator.pool_size(), 2);
    assert_eq!(
        (0..5).map(|_| rotator.next()).collect::<Vec<_>>(),
        vec!["k1", "k2", "k1", "k2", "k1"]
    );
}

#[test]
fn test_credentialRotator_emptyPool_shouldFail() {
    assert!(matches!(
        CredentialRotator::new(Vec::new()),
        Err(TranslationError::EmptyCredentialPool)
    ));
}
