use crate::core::error::{BotError, Result};
use crate::core::rates::RateSnapshot;
use crate::core::store::{NEVER_SYNCED, RateStore};
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const RATES_PARTITION: &str = "exchange_rates";
const SYNC_PARTITION: &str = "last_synced";
const SYNC_KEY: &str = "timestamp";

/// Rate store persisted in an fjall keyspace with two partitions: one entry
/// per currency, and a single last-sync record.
pub struct DiskRateStore {
    keyspace: Keyspace,
    rates: PartitionHandle,
    sync: PartitionHandle,
}

impl DiskRateStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(db_path).map_err(BotError::storage)?;

        let keyspace = Config::new(db_path.join("fjall_db"))
            .open()
            .map_err(BotError::storage)?;
        let rates = keyspace
            .open_partition(RATES_PARTITION, PartitionCreateOptions::default())
            .map_err(BotError::storage)?;
        let sync = keyspace
            .open_partition(SYNC_PARTITION, PartitionCreateOptions::default())
            .map_err(BotError::storage)?;
        debug!("Opened rate store at {}", db_path.display());

        Ok(Self {
            keyspace,
            rates,
            sync,
        })
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .map_err(BotError::storage)
    }
}

#[async_trait]
impl RateStore for DiskRateStore {
    async fn get_last_sync(&self) -> Result<i64> {
        match self.sync.get(SYNC_KEY).map_err(BotError::storage)? {
            Some(value) => serde_json::from_slice(&value).map_err(BotError::storage),
            None => Ok(NEVER_SYNCED),
        }
    }

    async fn set_last_sync(&self, timestamp: i64) -> Result<()> {
        let value = serde_json::to_vec(&timestamp).map_err(BotError::storage)?;
        self.sync
            .insert(SYNC_KEY, value)
            .map_err(BotError::storage)?;
        self.persist()?;
        debug!(timestamp, "Store PUT last sync");
        Ok(())
    }

    async fn get_rates(&self) -> Result<RateSnapshot> {
        let mut rates = RateSnapshot::new();
        for item in self.rates.iter() {
            let (key, value) = item.map_err(BotError::storage)?;
            let currency = std::str::from_utf8(&key).map_err(BotError::storage)?;
            let rate: f64 = serde_json::from_slice(&value).map_err(BotError::storage)?;
            rates.insert(currency.to_string(), rate);
        }
        debug!(count = rates.len(), "Store GET rates");
        Ok(rates)
    }

    async fn replace_rates(&self, rates: &RateSnapshot) -> Result<()> {
        // A batch shares one sequence number, so a key must not be both
        // removed and inserted in it.
        let mut batch = self.keyspace.batch();
        for item in self.rates.keys() {
            let key = item.map_err(BotError::storage)?;
            let keep = std::str::from_utf8(&key).is_ok_and(|c| rates.contains_key(c));
            if !keep {
                batch.remove(&self.rates, key);
            }
        }
        for (currency, rate) in rates {
            let value = serde_json::to_vec(rate).map_err(BotError::storage)?;
            batch.insert(&self.rates, currency.as_str(), value);
        }
        batch.commit().map_err(BotError::storage)?;
        self.persist()?;
        debug!(count = rates.len(), "Store REPLACE rates");
        Ok(())
    }
}
