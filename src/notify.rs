use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("failed to deliver telegram message: {0}")]
pub struct DeliveryError(pub String);

/// Delivery side of the bot, mockable in tests. The chat destination is fixed
/// at construction; callers only hand over text.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(bot_token),
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(self.chat_id, text)
            .await
            .map_err(|err| DeliveryError(err.to_string()))?;
        info!(chat_id = self.chat_id.0, "message delivered");
        Ok(())
    }
}
