//! Cost aggregation over a tree of model answer records
//!
//! Each record is attributed to a challenge, the directory that contains it.
//! Costs are rounded to three decimals at every accumulation step: the
//! running total, each challenge total and each per-model field. Rounding
//! again before output is therefore a no-op.
//!
//! Only a missing scan root is fatal. Unreadable or malformed records are
//! logged and skipped, and records of unpriced models are counted without a
//! cost.
//!
//! # Examples
//!
//! ```no_run
//! use hcstat::aggregation::{Aggregator, CostReport};
//! use hcstat_pricing::PricingTable;
//! use std::path::Path;
//!
//! # fn example() -> hcstat::Result<()> {
//! let aggregator = Aggregator::new(PricingTable::builtin());
//!
//! match aggregator.aggregate(Path::new("challenge_data"), false)? {
//!     CostReport::Total(cost) => println!("${cost:.3}"),
//!     CostReport::Detailed(stats) => println!("{} challenges", stats.total_challenges),
//! }
//!
//! let stats = aggregator.detailed_stats(Path::new("challenge_data"))?;
//! println!("median ${:.3}", stats.median_cost_per_challenge);
//! # Ok(())
//! # }
//! ```

use crate::data_loader::DataLoader;
use hcstat_core::error::Result;
use hcstat_core::money::{median, round_cost};
use hcstat_core::stats::{CostSummary, ItemCost, ModelDetail, ModelUsage, TOTAL_KEY, UsageStats};
use hcstat_core::types::{ChallengeId, ModelName, UsageRecord};
use hcstat_pricing::{CostCalculator, PricingTable};
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of one aggregation run
#[derive(Debug, Clone, PartialEq)]
pub enum CostReport {
    /// Rounded total cost only
    Total(f64),
    /// Full statistics including the per-model breakdown
    Detailed(UsageStats),
}

impl CostReport {
    /// Total cost regardless of the report shape
    pub fn total_cost(&self) -> f64 {
        match self {
            Self::Total(cost) => *cost,
            Self::Detailed(stats) => stats.total_cost,
        }
    }
}

/// Running totals of a single scan
///
/// Challenges and models are kept in first-encounter order.
struct StatsAccumulator {
    detailed: bool,
    total_files: u64,
    total_input_tokens: u64,
    total_output_tokens: u64,
    total_cost: f64,
    challenge_costs: IndexMap<ChallengeId, f64>,
    models: IndexMap<ModelName, ModelUsage>,
}

impl StatsAccumulator {
    fn new(detailed: bool) -> Self {
        Self {
            detailed,
            total_files: 0,
            total_input_tokens: 0,
            total_output_tokens: 0,
            total_cost: 0.0,
            challenge_costs: IndexMap::new(),
            models: IndexMap::new(),
        }
    }

    fn count_file(&mut self) {
        self.total_files += 1;
    }

    fn add_record(&mut self, record: &UsageRecord, cost: &ItemCost) {
        self.total_input_tokens += record.tokens.input_tokens;
        self.total_output_tokens += record.tokens.output_tokens;
        self.total_cost = round_cost(self.total_cost + cost.total_cost);

        let challenge_cost = self
            .challenge_costs
            .entry(record.challenge.clone())
            .or_insert(0.0);
        *challenge_cost = round_cost(*challenge_cost + cost.total_cost);

        if self.detailed {
            self.models
                .entry(record.model.clone())
                .or_default()
                .add(record.tokens, cost);
        }
    }

    fn into_stats(self) -> UsageStats {
        let challenge_costs: Vec<f64> = self.challenge_costs.into_values().collect();
        let total_challenges = challenge_costs.len() as u64;

        let (average_cost_per_challenge, median_cost_per_challenge) = if total_challenges > 0 {
            (
                round_cost(self.total_cost / total_challenges as f64),
                round_cost(median(&challenge_costs)),
            )
        } else {
            (0.0, 0.0)
        };

        let mut model_details: IndexMap<String, ModelDetail> = self
            .models
            .into_iter()
            .map(|(model, usage)| (model.to_string(), ModelDetail::Usage(usage)))
            .collect();

        if self.detailed {
            model_details.insert(
                TOTAL_KEY.to_string(),
                ModelDetail::Summary(CostSummary {
                    total_cost: round_cost(self.total_cost),
                }),
            );
        }

        UsageStats {
            total_files: self.total_files,
            total_challenges,
            total_input_tokens: self.total_input_tokens,
            total_output_tokens: self.total_output_tokens,
            total_cost: round_cost(self.total_cost),
            average_cost_per_challenge,
            median_cost_per_challenge,
            model_details,
            challenge_costs,
        }
    }
}

/// Main aggregation engine
pub struct Aggregator {
    cost_calculator: CostCalculator,
    show_progress: bool,
}

impl Aggregator {
    /// Create a new Aggregator over a pricing table
    pub fn new(pricing: Arc<PricingTable>) -> Self {
        Self {
            cost_calculator: CostCalculator::new(pricing),
            show_progress: false,
        }
    }

    /// Enable or disable the progress spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Pricing table used for lookups
    pub fn pricing(&self) -> &PricingTable {
        self.cost_calculator.pricing()
    }

    /// Aggregate every record below `root`
    ///
    /// With `detailed` unset only the rounded total cost is returned.
    ///
    /// # Errors
    ///
    /// Returns [`hcstat_core::HcstatError::PathNotFound`] if `root` does not
    /// exist. Per-file failures never surface here.
    pub fn aggregate(&self, root: &Path, detailed: bool) -> Result<CostReport> {
        let stats = self.scan(root, detailed, self.show_progress)?;
        if detailed {
            Ok(CostReport::Detailed(stats))
        } else {
            Ok(CostReport::Total(stats.total_cost))
        }
    }

    /// Rounded total cost of every record below `root`
    pub fn total_cost(&self, root: &Path) -> Result<f64> {
        Ok(self.aggregate(root, false)?.total_cost())
    }

    /// Full statistics of every record below `root`
    pub fn detailed_stats(&self, root: &Path) -> Result<UsageStats> {
        self.scan(root, true, self.show_progress)
    }

    /// Aggregate independent roots in parallel
    ///
    /// Each root is scanned against its own accumulator and reported
    /// separately, in the order given. The spinner is not shown.
    pub fn aggregate_many(&self, roots: &[PathBuf]) -> Vec<(PathBuf, Result<UsageStats>)> {
        roots
            .par_iter()
            .map(|root| (root.clone(), self.scan(root, true, false)))
            .collect()
    }

    fn scan(&self, root: &Path, detailed: bool, show_progress: bool) -> Result<UsageStats> {
        let loader = DataLoader::new(root)?;
        let mut acc = StatsAccumulator::new(detailed);

        let progress = if show_progress {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files processed")
            {
                pb.set_style(style);
            }
            pb.set_message(format!("Scanning {}", root.display()));
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        for (path, result) in loader.load_records() {
            acc.count_file();

            match result {
                Ok(record) => {
                    match self
                        .cost_calculator
                        .calculate(record.model.as_str(), &record.tokens)
                    {
                        Some(cost) => acc.add_record(&record, &cost),
                        None => debug!(
                            "No pricing for model {}, skipping cost of {}",
                            record.model,
                            path.display()
                        ),
                    }
                }
                Err(e) => warn!("Error processing file {}: {}", path.display(), e),
            }

            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let stats = acc.into_stats();
        info!(
            "Aggregated {} files into {} challenges, total ${:.3}",
            stats.total_files, stats.total_challenges, stats.total_cost
        );
        Ok(stats)
    }
}
