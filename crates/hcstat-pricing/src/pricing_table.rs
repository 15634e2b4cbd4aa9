//! Static Gemini pricing table
//!
//! Prices come from <https://ai.google.dev/gemini-api/docs/pricing>. They go
//! stale: when Google changes a price or ships a model that solves
//! challenges, update [`BUILTIN_PRICES`] in the same change. Deployments that
//! cannot wait for a release can pass a JSON override file instead (see
//! [`PricingTable::from_json_file`]).
//!
//! Lookups are exact on the model identifier. A model missing from the table
//! is not an error: its records are counted but never costed.

use hcstat_core::error::{HcstatError, Result};
use hcstat_core::types::ModelName;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Price per million tokens
pub const UNIT_1_M: f64 = 0.000001;
/// Price per thousand tokens
pub const UNIT_1_K: f64 = 0.001;

struct BuiltinPrice {
    model: &'static str,
    input_price: f64,
    output_price: f64,
    unit: f64,
}

#[rustfmt::skip]
static BUILTIN_PRICES: &[BuiltinPrice] = &[
    // Paid plan
    BuiltinPrice { model: "gemini-2.5-pro-preview-03-25", input_price: 1.25, output_price: 10.0, unit: UNIT_1_M },
    BuiltinPrice { model: "gemini-2.5-flash-preview-04-17", input_price: 0.15, output_price: 3.50, unit: UNIT_1_M },
    BuiltinPrice { model: "gemini-2.0-flash", input_price: 0.10, output_price: 0.40, unit: UNIT_1_M },
    BuiltinPrice { model: "gemini-2.0-flash-lite", input_price: 0.075, output_price: 0.30, unit: UNIT_1_M },
    // Free plan
    BuiltinPrice { model: "gemini-2.5-pro-exp-03-25", input_price: 0.0, output_price: 0.0, unit: UNIT_1_M },
    BuiltinPrice { model: "gemini-2.0-flash-thinking-exp-01-21", input_price: 0.0, output_price: 0.0, unit: UNIT_1_M },
];

static BUILTIN_TABLE: Lazy<Arc<PricingTable>> = Lazy::new(|| {
    Arc::new(PricingTable::from_entries(BUILTIN_PRICES.iter().map(|p| {
        PricingEntry {
            model: ModelName::new(p.model),
            input_price: p.input_price,
            output_price: p.output_price,
            unit: p.unit,
        }
    })))
});

/// Per-token prices of one model
///
/// A price is expressed per `1 / unit` tokens, so the cost of `n` tokens is
/// `n * price * unit`.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingEntry {
    pub model: ModelName,
    pub input_price: f64,
    pub output_price: f64,
    pub unit: f64,
}

/// Shape of one entry in a pricing override file
#[derive(Debug, Deserialize)]
struct PriceOverride {
    input_price: f64,
    output_price: f64,
    #[serde(default = "default_unit")]
    unit: f64,
}

fn default_unit() -> f64 {
    UNIT_1_M
}

/// Immutable mapping from model identifier to prices
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    entries: HashMap<ModelName, PricingEntry>,
}

impl PricingTable {
    /// Shared instance of the built-in table
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN_TABLE)
    }

    /// Build a table from entries; later entries win on duplicate models
    pub fn from_entries(entries: impl IntoIterator<Item = PricingEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.model.clone(), entry))
                .collect(),
        }
    }

    /// Parse a pricing override document
    ///
    /// The document maps model identifiers to prices:
    ///
    /// ```json
    /// { "gemini-2.5-flash": { "input_price": 0.30, "output_price": 2.50 } }
    /// ```
    ///
    /// `unit` is optional and defaults to [`UNIT_1_M`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, PriceOverride> = serde_json::from_str(json)?;

        let mut entries = Vec::with_capacity(raw.len());
        for (model, price) in raw {
            if price.input_price < 0.0 || price.output_price < 0.0 || price.unit <= 0.0 {
                return Err(HcstatError::Config(format!(
                    "Invalid pricing for {model}: prices must be non-negative and unit positive"
                )));
            }
            entries.push(PricingEntry {
                model: ModelName::new(model),
                input_price: price.input_price,
                output_price: price.output_price,
                unit: price.unit,
            });
        }

        Ok(Self::from_entries(entries))
    }

    /// Load a pricing override document from disk
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&content).map_err(|e| match e {
            HcstatError::Json(err) => HcstatError::parse(path, err),
            other => other,
        })?;
        info!(
            "Loaded {} pricing overrides from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// This table with every entry of `overrides` added or replaced
    pub fn with_overrides(&self, overrides: &PricingTable) -> Self {
        let mut entries = self.entries.clone();
        for (model, entry) in &overrides.entries {
            if entries.insert(model.clone(), entry.clone()).is_some() {
                debug!("Overriding built-in pricing for {}", model);
            }
        }
        Self { entries }
    }

    /// Prices of `model`, or `None` when the model is not priced
    pub fn get(&self, model: &str) -> Option<&PricingEntry> {
        self.entries.get(&ModelName::new(model))
    }

    /// Entries sorted by model name
    pub fn entries(&self) -> Vec<&PricingEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| a.model.cmp(&b.model));
        entries
    }

    /// Number of priced models
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no model is priced
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_lookup() {
        let table = PricingTable::builtin();
        let flash = table.get("gemini-2.0-flash").unwrap();

        assert_eq!(flash.input_price, 0.10);
        assert_eq!(flash.output_price, 0.40);
        assert_eq!(flash.unit, UNIT_1_M);
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_unknown_model_is_none() {
        let table = PricingTable::builtin();
        assert!(table.get("gpt-4o").is_none());
        // No fuzzy matching on prefixes
        assert!(table.get("gemini-2.0").is_none());
    }

    #[test]
    fn test_free_models_are_priced_at_zero() {
        let table = PricingTable::builtin();
        let exp = table.get("gemini-2.5-pro-exp-03-25").unwrap();
        assert_eq!(exp.input_price, 0.0);
        assert_eq!(exp.output_price, 0.0);
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let overrides = PricingTable::from_json_str(
            r#"{
                "gemini-2.0-flash": {"input_price": 0.2, "output_price": 0.8},
                "gemini-2.5-flash": {"input_price": 0.3, "output_price": 2.5, "unit": 0.001}
            }"#,
        )
        .unwrap();

        let table = PricingTable::builtin().with_overrides(&overrides);
        assert_eq!(table.len(), 7);
        assert_eq!(table.get("gemini-2.0-flash").unwrap().input_price, 0.2);
        assert_eq!(table.get("gemini-2.5-flash").unwrap().unit, UNIT_1_K);
        // The shared built-in table is untouched
        assert_eq!(
            PricingTable::builtin()
                .get("gemini-2.0-flash")
                .unwrap()
                .input_price,
            0.10
        );
    }

    #[test]
    fn test_negative_price_rejected() {
        let result =
            PricingTable::from_json_str(r#"{"m": {"input_price": -1.0, "output_price": 0.0}}"#);
        assert!(matches!(result, Err(HcstatError::Config(_))));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"gemini-2.0-flash-lite": {{"input_price": 0.05, "output_price": 0.2}}}}"#
        )
        .unwrap();

        let table = PricingTable::from_json_file(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("gemini-2.0-flash-lite").unwrap().input_price, 0.05);
    }

    #[test]
    fn test_from_json_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = PricingTable::from_json_file(file.path());
        assert!(matches!(result, Err(HcstatError::Parse { .. })));
    }

    #[test]
    fn test_entries_sorted() {
        let table = PricingTable::builtin();
        let names: Vec<_> = table.entries().iter().map(|e| e.model.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
