//! Monetary rounding helpers
//!
//! Every cost hcstat reports is kept at three decimal places. Rounding is
//! applied after each accumulation step as well as before output, so running
//! totals stay identical to re-summing the reported per-item values.

/// Number of decimal places kept for every reported cost
pub const COST_DECIMALS: usize = 3;

/// Round a cost to [`COST_DECIMALS`] places
///
/// The exact binary value is rounded to the nearest decimal, the same way
/// fixed-precision formatting prints it.
///
/// # Examples
/// ```
/// use hcstat_core::money::round_cost;
///
/// assert_eq!(round_cost(0.1004), 0.1);
/// assert_eq!(round_cost(0.0996), 0.1);
/// assert_eq!(round_cost(2.0), 2.0);
/// ```
pub fn round_cost(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", COST_DECIMALS, value)
        .parse()
        .unwrap_or(value)
}

/// Median of a list of costs, `0.0` for an empty list
///
/// An even number of values yields the mean of the two middle ones.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
