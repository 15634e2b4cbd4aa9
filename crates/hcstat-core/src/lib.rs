//! Core types, errors, and statistics for hcstat
//!
//! This crate provides the foundational types, error handling, cost rounding
//! and the usage statistics model shared by all other hcstat crates.

pub mod error;
pub mod money;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{HcstatError, Result};
pub use stats::{ItemCost, ModelDetail, ModelUsage, TOTAL_KEY, UsageStats};
pub use types::{ChallengeId, ModelName, TokenCounts, UsageRecord};
