use crate::core::error::Result;
use crate::core::rates::RateSnapshot;
use crate::core::store::{NEVER_SYNCED, RateStore};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

struct StoredRates {
    last_sync: i64,
    rates: RateSnapshot,
}

/// In-memory rate store; contents are lost when the process exits.
pub struct MemoryRateStore {
    inner: Mutex<StoredRates>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoredRates {
                last_sync: NEVER_SYNCED,
                rates: RateSnapshot::new(),
            }),
        }
    }
}

impl Default for MemoryRateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn get_last_sync(&self) -> Result<i64> {
        Ok(self.inner.lock().await.last_sync)
    }

    async fn set_last_sync(&self, timestamp: i64) -> Result<()> {
        self.inner.lock().await.last_sync = timestamp;
        debug!(timestamp, "Store PUT last sync");
        Ok(())
    }

    async fn get_rates(&self) -> Result<RateSnapshot> {
        Ok(self.inner.lock().await.rates.clone())
    }

    async fn replace_rates(&self, rates: &RateSnapshot) -> Result<()> {
        self.inner.lock().await.rates = rates.clone();
        debug!(count = rates.len(), "Store REPLACE rates");
        Ok(())
    }
}
