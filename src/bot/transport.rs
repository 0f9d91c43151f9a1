use crate::chart::ChartImage;
use anyhow::Result;
use async_trait::async_trait;

/// A text message received from a chat.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub chat_id: i64,
    /// Epoch seconds at which the message was sent.
    pub timestamp: i64,
    pub text: String,
}

/// What the bot answers with. Every inbound message gets exactly one.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Photo(ChartImage),
}

/// The chat service the bot talks through.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Waits for the next batch of messages. An empty batch is normal.
    async fn receive(&self) -> Result<Vec<InboundMessage>>;

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    async fn send_photo(&self, chat_id: i64, image: &ChartImage) -> Result<()>;

    async fn send(&self, chat_id: i64, reply: &Reply) -> Result<()> {
        match reply {
            Reply::Text(text) => self.send_text(chat_id, text).await,
            Reply::Photo(image) => self.send_photo(chat_id, image).await,
        }
    }
}
