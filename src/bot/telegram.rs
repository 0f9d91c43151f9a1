//! Telegram Bot API transport using long polling.

use super::transport::{InboundMessage, Transport};
use crate::chart::ChartImage;
use crate::core::config::TelegramConfig;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::debug;

pub struct TelegramTransport {
    client: reqwest::Client,
    // Contains the token; never log it
    endpoint: String,
    poll_timeout_secs: u64,
    offset: AtomicI64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    date: i64,
    chat: Chat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

impl TelegramTransport {
    pub fn new(config: &TelegramConfig, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("ratebot/1.0")
            .build()
            .context("Failed to build Telegram HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/bot{}", config.api_url.trim_end_matches('/'), token),
            poll_timeout_secs: config.poll_timeout_secs,
            offset: AtomicI64::new(0),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.endpoint, method)
    }

    async fn decode<T: DeserializeOwned>(method: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse {} response ({}): {}", method, status, e.without_url()))?;
        if !body.ok {
            return Err(anyhow!(
                "Telegram {} failed ({}): {}",
                method,
                status,
                body.description.unwrap_or_default()
            ));
        }
        body.result
            .ok_or_else(|| anyhow!("Telegram {} returned no result", method))
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn receive(&self) -> Result<Vec<InboundMessage>> {
        let offset = self.offset.load(Ordering::SeqCst);
        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", self.poll_timeout_secs.to_string()),
                ("allowed_updates", r#"["message"]"#.to_string()),
            ])
            // Long polling holds the request open for up to poll_timeout_secs
            .timeout(Duration::from_secs(self.poll_timeout_secs + 10))
            .send()
            .await
            .map_err(|e| anyhow!("getUpdates request failed: {}", e.without_url()))?;

        let updates: Vec<Update> = Self::decode("getUpdates", response).await?;
        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset.store(last + 1, Ordering::SeqCst);
        }
        debug!(count = updates.len(), offset, "Received updates");

        Ok(updates
            .into_iter()
            .filter_map(|update| update.message)
            .filter_map(|message| {
                message.text.map(|text| InboundMessage {
                    chat_id: message.chat.id,
                    timestamp: message.date,
                    text,
                })
            })
            .collect())
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .map_err(|e| anyhow!("sendMessage request failed: {}", e.without_url()))?;
        let _: serde_json::Value = Self::decode("sendMessage", response).await?;
        debug!(chat_id, "Sent text");
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, image: &ChartImage) -> Result<()> {
        let photo = reqwest::multipart::Part::bytes(image.png.clone())
            .file_name(image.file_name.clone())
            .mime_str("image/png")
            .map_err(|e| anyhow!("Invalid photo part: {}", e.without_url()))?;
        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", photo);

        let response = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| anyhow!("sendPhoto request failed: {}", e.without_url()))?;
        let _: serde_json::Value = Self::decode("sendPhoto", response).await?;
        debug!(chat_id, bytes = image.png.len(), "Sent photo");
        Ok(())
    }
}
