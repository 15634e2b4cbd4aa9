//! Pricing table and cost calculator for hcstat
//!
//! This crate holds the per-model Gemini token prices and turns token
//! counts into rounded per-record costs.

pub mod cost_calculator;
pub mod pricing_table;

pub use cost_calculator::CostCalculator;
pub use pricing_table::{PricingEntry, PricingTable, UNIT_1_K, UNIT_1_M};
