//! hcstat - Cost statistics for Gemini-solved grid image challenges
//!
//! This library provides functionality to:
//! - Scan a directory tree of `*_model_answer.json` records
//! - Price each record against a per-model Gemini pricing table
//! - Aggregate costs per challenge and per model, rounded to three decimals
//! - Export the statistics as JSON and render them as tables
//!
//! # Examples
//!
//! ```no_run
//! use hcstat::{aggregation::Aggregator, export::export};
//! use hcstat_pricing::PricingTable;
//! use std::path::Path;
//!
//! fn main() -> hcstat::Result<()> {
//!     let aggregator = Aggregator::new(PricingTable::builtin());
//!
//!     let total = aggregator.total_cost(Path::new("challenge_data"))?;
//!     println!("Total: ${total:.3}");
//!
//!     let stats = export(
//!         &aggregator,
//!         Path::new("challenge_data"),
//!         Some(Path::new("stats.json")),
//!     )?;
//!     println!("{} challenges", stats.total_challenges);
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod cli;
pub mod data_loader;
pub mod export;
pub mod output;

// Re-export commonly used types
pub use hcstat_core::{
    ChallengeId, HcstatError, ModelName, Result, TokenCounts, UsageRecord, UsageStats,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
