//! The chat-facing side of the bot: parsing commands, running them against
//! the rate cache and delivering replies through a [`Transport`].

pub mod command;
pub mod handlers;
pub mod telegram;
pub mod transport;

use crate::chart::ChartRenderer;
use crate::core::error::Result;
use crate::core::{RateCache, RateProvider};
use command::{Command, parse_command};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
pub use transport::{InboundMessage, Reply, Transport};

/// Delay before polling again after the transport failed.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Everything a command needs, passed explicitly to the bot loop.
pub struct App {
    cache: RateCache,
    provider: Arc<dyn RateProvider>,
    renderer: Arc<dyn ChartRenderer>,
}

impl App {
    pub fn new(
        cache: RateCache,
        provider: Arc<dyn RateProvider>,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        Self {
            cache,
            provider,
            renderer,
        }
    }

    /// Answers one message. Failures become a plain-language reply; internal
    /// ones are logged as errors.
    #[instrument(name = "HandleMessage", skip(self))]
    pub async fn handle(&self, text: &str, timestamp: i64) -> Reply {
        let result = match parse_command(text) {
            Ok(command) => self.execute(command, timestamp).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(reply) => reply,
            Err(e) if e.is_internal() => {
                error!(error = %e, "Command failed");
                Reply::Text(e.user_message().to_string())
            }
            Err(e) => {
                warn!(error = %e, "Command rejected");
                Reply::Text(e.user_message().to_string())
            }
        }
    }

    pub async fn execute(&self, command: Command, timestamp: i64) -> Result<Reply> {
        debug!(?command, "Executing command");
        match command {
            Command::List => {
                let rates = self.cache.get_current_rates(timestamp).await?;
                Ok(Reply::Text(handlers::format_rate_list(&rates)))
            }
            Command::Exchange { amount, currency } => {
                let rates = self.cache.get_current_rates(timestamp).await?;
                let converted = handlers::convert(amount, &currency, &rates)?;
                Ok(Reply::Text(handlers::format_exchange(
                    amount, &currency, converted,
                )))
            }
            Command::History {
                base,
                quote,
                days,
                title,
            } => {
                let (start, end) = handlers::history_range(timestamp, days)?;
                let history = self
                    .provider
                    .fetch_history(&base, &quote, start, end)
                    .await?;
                let chart = handlers::history_chart(&title, &base, &quote, &history)?;
                Ok(Reply::Photo(self.renderer.render(&chart)?))
            }
            Command::Help => Ok(Reply::Text(handlers::HELP_TEXT.to_string())),
            Command::Invalid(_) => Ok(Reply::Text(handlers::UNKNOWN_COMMAND_TEXT.to_string())),
        }
    }

    /// Answers every message of a batch, in order.
    pub async fn serve_batch<T>(&self, transport: &T, messages: Vec<InboundMessage>)
    where
        T: Transport + ?Sized,
    {
        for message in messages {
            let reply = self.handle(&message.text, message.timestamp).await;
            if let Err(e) = transport.send(message.chat_id, &reply).await {
                error!(chat_id = message.chat_id, error = %e, "Failed to deliver reply");
            }
        }
    }
}

/// Polls `transport` and answers messages one at a time until `shutdown`
/// completes.
pub async fn run<T, F>(app: &App, transport: &T, shutdown: F)
where
    T: Transport + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    info!("Bot is running");
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down");
                return;
            }
            batch = transport.receive() => match batch {
                Ok(messages) => app.serve_batch(transport, messages).await,
                Err(e) => {
                    warn!(error = %e, "Polling failed, retrying in {:?}", POLL_RETRY_DELAY);
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                }
            }
        }
    }
}
