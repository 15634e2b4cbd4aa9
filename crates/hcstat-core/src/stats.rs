//! Usage statistics types for hcstat
//!
//! Pure data structures produced by an aggregation run. These types have no
//! dependencies on pricing or on the data loader.

use crate::money::round_cost;
use crate::types::TokenCounts;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved `model_details` key of the grand-total entry
pub const TOTAL_KEY: &str = "Total";

/// Cost of a single usage record in USD
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemCost {
    /// Cost of the prompt tokens
    pub input_cost: f64,
    /// Cost of the candidate tokens
    pub output_cost: f64,
    /// Rounded sum of input and output cost
    pub total_cost: f64,
}

/// Per-model cost breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    /// Number of costed records produced by this model
    pub usage_count: u64,
}

impl ModelUsage {
    /// Fold one costed record into the breakdown, rounding each running cost
    pub fn add(&mut self, tokens: TokenCounts, cost: &ItemCost) {
        self.input_tokens += tokens.input_tokens;
        self.output_tokens += tokens.output_tokens;
        self.input_cost = round_cost(self.input_cost + cost.input_cost);
        self.output_cost = round_cost(self.output_cost + cost.output_cost);
        self.total_cost = round_cost(self.total_cost + cost.total_cost);
        self.usage_count += 1;
    }

    fn round_costs(&mut self) {
        self.input_cost = round_cost(self.input_cost);
        self.output_cost = round_cost(self.output_cost);
        self.total_cost = round_cost(self.total_cost);
    }
}

/// Grand-total entry stored under [`TOTAL_KEY`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub total_cost: f64,
}

/// One value of the `model_details` mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelDetail {
    /// Breakdown for a priced model
    Usage(ModelUsage),
    /// Grand total appended after every model
    Summary(CostSummary),
}

impl ModelDetail {
    /// Total cost carried by either variant
    pub fn total_cost(&self) -> f64 {
        match self {
            Self::Usage(usage) => usage.total_cost,
            Self::Summary(summary) => summary.total_cost,
        }
    }

    fn round_costs(&mut self) {
        match self {
            Self::Usage(usage) => usage.round_costs(),
            Self::Summary(summary) => summary.total_cost = round_cost(summary.total_cost),
        }
    }
}

/// Aggregate statistics of one scan
///
/// Field names match the exported JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Model answer files found, including unreadable and unpriced ones
    pub total_files: u64,
    /// Challenges with at least one costed record
    pub total_challenges: u64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    /// Total cost in USD
    pub total_cost: f64,
    pub average_cost_per_challenge: f64,
    pub median_cost_per_challenge: f64,
    /// Cost details by model, followed by the [`TOTAL_KEY`] entry
    pub model_details: IndexMap<String, ModelDetail>,
    /// Cost of each challenge in first-seen order
    pub challenge_costs: Vec<f64>,
}

impl UsageStats {
    /// Round every monetary field in place
    ///
    /// Rounding already-rounded values is a no-op, so this may be applied
    /// any number of times.
    pub fn round_costs(&mut self) {
        self.total_cost = round_cost(self.total_cost);
        self.average_cost_per_challenge = round_cost(self.average_cost_per_challenge);
        self.median_cost_per_challenge = round_cost(self.median_cost_per_challenge);
        for detail in self.model_details.values_mut() {
            detail.round_costs();
        }
        for cost in &mut self.challenge_costs {
            *cost = round_cost(*cost);
        }
    }

    /// Copy of these stats with every monetary field rounded
    pub fn rounded(&self) -> Self {
        let mut stats = self.clone();
        stats.round_costs();
        stats
    }

    /// Breakdown of a single model, if it was priced during the scan
    pub fn model_usage(&self, model: &str) -> Option<&ModelUsage> {
        match self.model_details.get(model) {
            Some(ModelDetail::Usage(usage)) => Some(usage),
            _ => None,
        }
    }

    /// Iterate over per-model breakdowns, skipping the grand-total entry
    pub fn models(&self) -> impl Iterator<Item = (&str, &ModelUsage)> {
        self.model_details
            .iter()
            .filter_map(|(name, detail)| match detail {
                ModelDetail::Usage(usage) => Some((name.as_str(), usage)),
                ModelDetail::Summary(_) => None,
            })
    }

    /// Grand total recorded under [`TOTAL_KEY`]
    pub fn grand_total(&self) -> Option<f64> {
        self.model_details.get(TOTAL_KEY).map(ModelDetail::total_cost)
    }
}
