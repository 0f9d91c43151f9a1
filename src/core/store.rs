//! Persistence abstraction for the current rate snapshot

use crate::core::error::Result;
use crate::core::rates::RateSnapshot;
use async_trait::async_trait;

/// Timestamp returned by [`RateStore::get_last_sync`] when rates were never fetched.
pub const NEVER_SYNCED: i64 = 0;

/// Owns the two persisted records: the rate snapshot and the time it was
/// last refreshed. Nothing else writes to storage.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Epoch seconds of the last refresh, or [`NEVER_SYNCED`].
    async fn get_last_sync(&self) -> Result<i64>;

    async fn set_last_sync(&self, timestamp: i64) -> Result<()>;

    async fn get_rates(&self) -> Result<RateSnapshot>;

    /// Drops every stored rate and writes `rates` in their place.
    async fn replace_rates(&self, rates: &RateSnapshot) -> Result<()>;
}
