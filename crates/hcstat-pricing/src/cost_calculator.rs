//! Cost calculator module for computing per-record costs
//!
//! Input and output costs are each rounded to three decimals before they
//! are summed, and the sum is rounded again. Aggregates built from these
//! values keep the same cadence, so totals never drift from the sum of the
//! reported items.
//!
//! # Examples
//!
//! ```
//! use hcstat_core::types::TokenCounts;
//! use hcstat_pricing::{CostCalculator, PricingTable};
//!
//! let calculator = CostCalculator::new(PricingTable::builtin());
//! let tokens = TokenCounts::new(1_000_000, 500_000);
//!
//! let cost = calculator.calculate("gemini-2.0-flash", &tokens).unwrap();
//! assert_eq!(cost.input_cost, 0.1);
//! assert_eq!(cost.output_cost, 0.2);
//! assert_eq!(cost.total_cost, 0.3);
//!
//! assert!(calculator.calculate("unpriced-model", &tokens).is_none());
//! ```

use crate::pricing_table::{PricingEntry, PricingTable};
use hcstat_core::money::round_cost;
use hcstat_core::stats::ItemCost;
use hcstat_core::types::TokenCounts;
use std::sync::Arc;
use tracing::debug;

/// Calculates record costs from token usage and the pricing table
pub struct CostCalculator {
    pricing: Arc<PricingTable>,
}

impl CostCalculator {
    /// Create a new CostCalculator over a pricing table
    pub fn new(pricing: Arc<PricingTable>) -> Self {
        Self { pricing }
    }

    /// The pricing table used for lookups
    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    /// Cost of `tokens` spent on `model`
    ///
    /// Returns `None` when the model has no pricing entry. Callers treat that
    /// as "count the record, skip the cost".
    pub fn calculate(&self, model: &str, tokens: &TokenCounts) -> Option<ItemCost> {
        let entry = self.pricing.get(model)?;
        Some(Self::calculate_from_pricing(tokens, entry))
    }

    /// Cost of `tokens` under a known pricing entry
    ///
    /// This is a pure function; useful when the entry was already looked up.
    pub fn calculate_from_pricing(tokens: &TokenCounts, entry: &PricingEntry) -> ItemCost {
        let input_cost = round_cost(tokens.input_tokens as f64 * entry.input_price * entry.unit);
        let output_cost =
            round_cost(tokens.output_tokens as f64 * entry.output_price * entry.unit);
        let total_cost = round_cost(input_cost + output_cost);

        debug!(
            "Calculated cost: ${:.3} for {} total tokens on {}",
            total_cost,
            tokens.total(),
            entry.model
        );

        ItemCost {
            input_cost,
            output_cost,
            total_cost,
        }
    }
}
