//! Output formatting module for hcstat
//!
//! This module provides formatters for displaying cost data in different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use hcstat::output::get_formatter;
//! use hcstat_core::UsageStats;
//!
//! let stats = UsageStats::default();
//!
//! let formatter = get_formatter(false);
//! println!("{}", formatter.format_stats(&stats));
//!
//! let json_formatter = get_formatter(true);
//! assert!(json_formatter.format_stats(&stats).contains("\"total_files\": 0"));
//! ```

use colored::Colorize;
use hcstat_classifier::ImageBinaryChallenge;
use hcstat_core::stats::UsageStats;
use hcstat_pricing::PricingEntry;
use prettytable::{Cell, Row, Table, format, row};
use serde_json::json;
use std::path::Path;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format the total cost of a scan root
    fn format_total(&self, root: &Path, total_cost: f64) -> String;

    /// Format full usage statistics
    fn format_stats(&self, stats: &UsageStats) -> String;

    /// Format the pricing table
    fn format_pricing(&self, entries: &[&PricingEntry]) -> String;

    /// Format a solved image challenge
    fn format_answer(&self, answer: &ImageBinaryChallenge) -> String;
}

/// Table formatter for human-readable output
///
/// Token counts get thousands separators and costs are shown in dollars
/// with three decimals, the precision every cost is kept at.
pub struct TableFormatter;

impl TableFormatter {
    /// Format a number with thousands separators
    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    /// Format currency with dollar sign
    fn format_currency(amount: f64) -> String {
        format!("${amount:.3}")
    }

    /// Price per unit, e.g. `$0.10 / 1M`
    fn format_price(price: f64, unit: f64) -> String {
        let per = 1.0 / unit;
        let unit_label = if (per - 1_000_000.0).abs() < 0.5 {
            "1M".to_string()
        } else if (per - 1_000.0).abs() < 0.5 {
            "1K".to_string()
        } else {
            format!("{per:.0}")
        };
        format!("${price} / {unit_label}")
    }
}

impl OutputFormatter for TableFormatter {
    fn format_total(&self, root: &Path, total_cost: f64) -> String {
        format!(
            "Total cost for {}: {}",
            root.display(),
            Self::format_currency(total_cost).bold().green()
        )
    }

    fn format_stats(&self, stats: &UsageStats) -> String {
        let mut output = String::new();

        let mut summary = Table::new();
        summary.set_format(*format::consts::FORMAT_CLEAN);
        summary.add_row(row!["Files", r -> Self::format_number(stats.total_files)]);
        summary.add_row(row!["Challenges", r -> Self::format_number(stats.total_challenges)]);
        summary.add_row(row!["Input tokens", r -> Self::format_number(stats.total_input_tokens)]);
        summary.add_row(row!["Output tokens", r -> Self::format_number(stats.total_output_tokens)]);
        summary.add_row(row!["Average / challenge", r -> Self::format_currency(stats.average_cost_per_challenge)]);
        summary.add_row(row!["Median / challenge", r -> Self::format_currency(stats.median_cost_per_challenge)]);
        summary.add_row(row![b -> "Total cost", rb -> Self::format_currency(stats.total_cost)]);
        output.push_str(&summary.to_string());

        if stats.models().next().is_none() {
            return output;
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "Model",
            b -> "Calls",
            b -> "Input",
            b -> "Output",
            b -> "Input Cost",
            b -> "Output Cost",
            b -> "Cost"
        ]);

        for (model, usage) in stats.models() {
            table.add_row(row![
                model,
                r -> Self::format_number(usage.usage_count),
                r -> Self::format_number(usage.input_tokens),
                r -> Self::format_number(usage.output_tokens),
                r -> Self::format_currency(usage.input_cost),
                r -> Self::format_currency(usage.output_cost),
                r -> Self::format_currency(usage.total_cost)
            ]);
        }

        table.add_row(Row::new(vec![Cell::new(""); 7]));
        table.add_row(row![
            b -> "TOTAL",
            "",
            rb -> Self::format_number(stats.total_input_tokens),
            rb -> Self::format_number(stats.total_output_tokens),
            "",
            "",
            rb -> Self::format_currency(stats.grand_total().unwrap_or(stats.total_cost))
        ]);

        output.push('\n');
        output.push_str(&table.to_string());
        output
    }

    fn format_pricing(&self, entries: &[&PricingEntry]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Model", b -> "Input", b -> "Output"]);

        for entry in entries {
            table.add_row(row![
                entry.model,
                r -> Self::format_price(entry.input_price, entry.unit),
                r -> Self::format_price(entry.output_price, entry.unit)
            ]);
        }

        table.to_string()
    }

    fn format_answer(&self, answer: &ImageBinaryChallenge) -> String {
        let mut grid = [["."; 3]; 3];
        for cell in answer.coordinates.iter().filter(|c| c.in_bounds()) {
            grid[cell.row() as usize][cell.col() as usize] = "x";
        }

        let mut output = format!("{}\n", answer.challenge_prompt.bold());
        for row in grid {
            output.push_str(&row.join(" "));
            output.push('\n');
        }
        output
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    fn pretty(value: &serde_json::Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_default()
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_total(&self, root: &Path, total_cost: f64) -> String {
        Self::pretty(&json!({
            "path": root.display().to_string(),
            "total_cost": total_cost,
        }))
    }

    fn format_stats(&self, stats: &UsageStats) -> String {
        Self::pretty(&json!(stats))
    }

    fn format_pricing(&self, entries: &[&PricingEntry]) -> String {
        let pricing: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|entry| {
                (
                    entry.model.to_string(),
                    json!({
                        "input_price": entry.input_price,
                        "output_price": entry.output_price,
                        "unit": entry.unit,
                    }),
                )
            })
            .collect();
        Self::pretty(&serde_json::Value::Object(pricing))
    }

    fn format_answer(&self, answer: &ImageBinaryChallenge) -> String {
        Self::pretty(&json!(answer))
    }
}

/// Get a formatter for the requested output mode
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}
