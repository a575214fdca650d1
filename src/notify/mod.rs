//! Chat notification module

pub mod telegram;

use async_trait::async_trait;
use teloxide::types::ChatId;

use crate::error::BotError;

pub use telegram::TelegramNotifier;

/// Outbound chat channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), BotError>;
}
