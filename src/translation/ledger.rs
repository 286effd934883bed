/*!
 * Cost accounting for remote calls.
 */

use log::info;
use parking_lot::Mutex;

use crate::app_config::{ModelRate, PricingConfig};
use crate::providers::TokenUsage;

use super::tokens::ModelTier;

/// Running totals, in rate units (tokens × per-million price)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostTotals {
    pub prompt: f64,
    pub completion: f64,
}

impl CostTotals {
    pub fn total(&self) -> f64 {
        self.prompt + self.completion
    }
}

/// Append-only, process-wide spend tracker
///
/// Totals only grow. They are shared by every batch worker and mutated under
/// one lock per `record` call.
#[derive(Debug)]
pub struct CostLedger {
    pricing: PricingConfig,
    totals: Mutex<CostTotals>,
}

impl CostLedger {
    pub fn new(pricing: PricingConfig) -> Self {
        Self {
            pricing,
            totals: Mutex::new(CostTotals::default()),
        }
    }

    fn rate(&self, tier: ModelTier) -> ModelRate {
        match tier {
            ModelTier::Standard => self.pricing.standard,
            ModelTier::LongContext => self.pricing.long_context,
        }
    }

    /// Add the cost of one successful call and return what was added
    pub fn record(&self, tier: ModelTier, usage: TokenUsage) -> CostTotals {
        let rate = self.rate(tier);
        let added = CostTotals {
            prompt: usage.prompt_tokens as f64 * rate.prompt_per_million,
            completion: usage.completion_tokens as f64 * rate.completion_per_million,
        };

        let snapshot = {
            let mut totals = self.totals.lock();
            totals.prompt += added.prompt;
            totals.completion += added.completion;
            *totals
        };

        info!(
            "Prompt spent: ${:.6}, completion spent: ${:.6}, total spent: ${:.6}",
            to_dollars(snapshot.prompt),
            to_dollars(snapshot.completion),
            to_dollars(snapshot.total())
        );
        added
    }

    /// Current totals, in rate units
    pub fn totals(&self) -> CostTotals {
        *self.totals.lock()
    }

    /// Cumulative prompt spend in dollars
    pub fn prompt_cost(&self) -> f64 {
        to_dollars(self.totals().prompt)
    }

    /// Cumulative completion spend in dollars
    pub fn completion_cost(&self) -> f64 {
        to_dollars(self.totals().completion)
    }

    /// Cumulative spend in dollars
    pub fn total_cost(&self) -> f64 {
        to_dollars(self.totals().total())
    }

    /// Generate a summary of spend
    pub fn summary(&self) -> String {
        let totals = self.totals();
        format!(
            "Cost Summary:\n\
             Prompt spent: ${:.6}\n\
             Completion spent: ${:.6}\n\
             Total spent: ${:.6}",
            to_dollars(totals.prompt),
            to_dollars(totals.completion),
            to_dollars(totals.total())
        )
    }
}

impl Default for CostLedger {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

/// Rate units are per-million prices times tokens
fn to_dollars(units: f64) -> f64 {
    units / 1e6
}
