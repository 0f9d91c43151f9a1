//! Exchange rate types and the provider abstraction

use crate::core::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Every stored rate is expressed as units of a currency per one USD.
pub const BASE_CURRENCY: &str = "USD";

/// Currency code to rate against [`BASE_CURRENCY`]. Always replaced as a whole.
pub type RateSnapshot = BTreeMap<String, f64>;

/// Date to {currency: rate}, ascending by date.
pub type RateHistory = BTreeMap<NaiveDate, BTreeMap<String, f64>>;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Current rates for every currency the provider knows, against `base`.
    async fn fetch_latest(&self, base: &str) -> Result<RateSnapshot>;

    /// Daily rates of `quote` against `base` between `start` and `end`, both inclusive.
    async fn fetch_history(
        &self,
        base: &str,
        quote: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateHistory>;
}

/// Rounds half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Shortest representation that round-trips, always with a fractional part:
/// `100.0`, `90.0`, `12.35`.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Flattens a history into ascending `(date, rate)` pairs for `quote`.
/// Dates without a rate for `quote` are skipped.
pub fn history_series(history: &RateHistory, quote: &str) -> Vec<(NaiveDate, f64)> {
    history
        .iter()
        .filter_map(|(date, rates)| rates.get(quote).map(|rate| (*date, *rate)))
        .collect()
}
