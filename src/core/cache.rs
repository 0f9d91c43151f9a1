use crate::core::error::{BotError, Result};
use crate::core::rates::{BASE_CURRENCY, RateProvider, RateSnapshot};
use crate::core::store::{NEVER_SYNCED, RateStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Rates older than this many seconds are fetched again.
pub const STALENESS_THRESHOLD_SECS: i64 = 600;

/// Serves the stored snapshot while it is fresh and refreshes it from the
/// provider once it goes stale.
#[derive(Clone)]
pub struct RateCache {
    store: Arc<dyn RateStore>,
    provider: Arc<dyn RateProvider>,
}

impl RateCache {
    pub fn new(store: Arc<dyn RateStore>, provider: Arc<dyn RateProvider>) -> Self {
        Self { store, provider }
    }

    /// Current rates as seen at `request_time` (epoch seconds).
    ///
    /// A failed refresh leaves the stored snapshot and timestamp untouched and
    /// returns the provider error; older rates are not served as a fallback.
    pub async fn get_current_rates(&self, request_time: i64) -> Result<RateSnapshot> {
        let last_sync = self.store.get_last_sync().await?;
        let age = request_time - last_sync;

        if last_sync != NEVER_SYNCED && age <= STALENESS_THRESHOLD_SECS {
            debug!(last_sync, age, "Cache HIT");
            return self.store.get_rates().await;
        }

        debug!(last_sync, age, "Cache STALE");
        let rates = match self.provider.fetch_latest(BASE_CURRENCY).await {
            Ok(rates) => rates,
            Err(e) => {
                warn!(error = %e, "Rate refresh failed");
                return Err(match e {
                    BotError::ProviderUnavailable(_) => e,
                    other => BotError::ProviderUnavailable(other.to_string()),
                });
            }
        };

        self.store.replace_rates(&rates).await?;
        self.store.set_last_sync(request_time).await?;
        info!(count = rates.len(), request_time, "Refreshed exchange rates");
        Ok(rates)
    }
}
