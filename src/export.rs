//! Stats exporter
//!
//! Runs a detailed aggregation, re-rounds every cost and optionally writes
//! the statistics as a pretty-printed JSON document.

use crate::aggregation::Aggregator;
use hcstat_core::error::Result;
use hcstat_core::stats::UsageStats;
use std::fs;
use std::path::Path;
use tracing::info;

/// Aggregate `root` in detailed mode and optionally save the result
///
/// The returned statistics are the rounded ones, identical to what is
/// written to `output`.
pub fn export(aggregator: &Aggregator, root: &Path, output: Option<&Path>) -> Result<UsageStats> {
    let stats = aggregator.detailed_stats(root)?.rounded();

    if let Some(path) = output {
        write_stats_json(&stats, path)?;
    }

    Ok(stats)
}

/// Write `stats` to `path` as indented JSON, creating parent directories
pub fn write_stats_json(stats: &UsageStats, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&stats.rounded())?;
    fs::write(path, json)?;

    info!("Stats saved to {}", path.display());
    Ok(())
}
