pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::store::RateStore;
use anyhow::{Context, Result};
use disk::DiskRateStore;
use std::sync::Arc;

/// Opens the persistent rate store under the configured data directory.
pub fn open_rate_store(config: &AppConfig) -> Result<Arc<dyn RateStore>> {
    let data_path = config.default_data_path()?;
    let store = DiskRateStore::open(&data_path.join("cache"))
        .with_context(|| format!("Failed to open rate store in {}", data_path.display()))?;
    Ok(Arc::new(store))
}
