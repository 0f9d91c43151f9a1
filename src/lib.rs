pub mod bot;
pub mod chart;
pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::bot::App;
use crate::chart::PlottersRenderer;
use crate::core::config::AppConfig;
use crate::core::{RateCache, RateProvider, RateStore};
use crate::providers::ExchangeRatesApiProvider;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    /// Serve Telegram chats
    Run,
    /// Answer one command locally
    Ask { text: String, chart_out: PathBuf },
}

/// Loads the config from `config_path`, or from the default location. A
/// missing default file falls back to built-in defaults.
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => {
            let path = AppConfig::default_config_path()?;
            if path.exists() {
                AppConfig::load()
            } else {
                debug!("No config at {}, using defaults", path.display());
                Ok(AppConfig::from_defaults())
            }
        }
    }
}

/// Wires the provider, cache and chart renderer together around `store`.
pub fn build_app(config: &AppConfig, store: Arc<dyn RateStore>) -> Result<App> {
    let provider: Arc<dyn RateProvider> = Arc::new(
        ExchangeRatesApiProvider::new(
            &config.provider.base_url,
            Duration::from_secs(config.provider.timeout_secs),
        )
        .context("Failed to create rate provider")?,
    );
    let cache = RateCache::new(store, Arc::clone(&provider));
    Ok(App::new(cache, provider, Arc::new(PlottersRenderer::default())))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ratebot starting...");

    let config = load_config(config_path)?;
    debug!("Loaded config: {:#?}", config.provider);

    let store = store::open_rate_store(&config)?;
    let app = build_app(&config, store)?;

    match command {
        AppCommand::Run => cli::run::run(&config, &app).await,
        AppCommand::Ask { text, chart_out } => cli::ask::ask(&app, &text, &chart_out).await,
    }
}
