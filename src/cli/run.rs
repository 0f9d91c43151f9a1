use crate::bot::{self, App, telegram::TelegramTransport};
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::error;

/// Serves Telegram chats until Ctrl-C.
pub async fn run(config: &AppConfig, app: &App) -> Result<()> {
    let token = config.telegram_token()?;
    let transport = TelegramTransport::new(&config.telegram, token)?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Cannot listen for Ctrl-C; stop the process to exit");
            std::future::pending::<()>().await;
        }
    };
    bot::run(app, &transport, shutdown).await;
    Ok(())
}
