//! CLI interface for hcstat
//!
//! # Example
//!
//! ```bash
//! # Total cost of every challenge below a directory
//! hcstat cost challenge_data
//!
//! # Per-model breakdown as JSON
//! hcstat cost challenge_data --detailed --json
//!
//! # Save the full statistics
//! hcstat export challenge_data --output stats.json
//!
//! # Solve one challenge and record its usage next to the screenshot
//! GEMINI_API_KEY=... hcstat classify shot.png --answer-dir challenge_data/run-1
//! ```

use clap::{Parser, Subcommand};
use hcstat_core::error::Result;
use hcstat_pricing::PricingTable;
use std::path::PathBuf;
use std::sync::Arc;

/// Cost statistics for Gemini-solved image challenges
#[derive(Parser, Debug, Clone)]
#[command(name = "hcstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors, even if --verbose is configured elsewhere
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// JSON file with pricing overrides: {"model": {"input_price": .., "output_price": .., "unit": ..}}
    #[arg(long, global = true, env = "HCSTAT_PRICING")]
    pub pricing: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the cost of every challenge below one or more directories
    Cost {
        /// Directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Show full statistics with a per-model breakdown
        #[arg(long, short = 'd')]
        detailed: bool,
    },

    /// Compute full statistics and optionally save them as JSON
    Export {
        /// Directory to scan
        path: PathBuf,

        /// File to write the statistics to
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show the pricing table in effect
    Pricing,

    /// Solve a grid image challenge with a Gemini model
    Classify {
        /// Challenge screenshot
        image: PathBuf,

        /// Model to use
        #[arg(long, short = 'm', default_value = hcstat_classifier::DEFAULT_MODEL)]
        model: String,

        /// Constrain the answer to the response schema
        #[arg(long)]
        schema: bool,

        /// Thinking budget in tokens, for models that support it
        #[arg(long)]
        thinking_budget: Option<i32>,

        /// Directory to write the raw model answer to
        #[arg(long)]
        answer_dir: Option<PathBuf>,

        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Override the Gemini API base URL
        #[arg(long, env = "GEMINI_BASE_URL")]
        base_url: Option<String>,
    },
}

impl Cli {
    /// Built-in pricing, with the override file applied if one is configured
    pub fn pricing_table(&self) -> Result<Arc<PricingTable>> {
        let builtin = PricingTable::builtin();
        match &self.pricing {
            Some(path) => {
                let overrides = PricingTable::from_json_file(path)?;
                Ok(Arc::new(builtin.with_overrides(&overrides)))
            }
            None => Ok(builtin),
        }
    }

    /// Default tracing directive for the selected verbosity
    pub fn log_level(&self) -> &'static str {
        if self.verbose && !self.quiet {
            "info"
        } else {
            "warn"
        }
    }
}
