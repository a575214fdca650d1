//! Telegram Bot API notifications

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::error::BotError;
use crate::notify::Notifier;

/// Telegram notifier
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), BotError> {
        self.bot.send_message(chat_id, text.to_string()).await?;
        Ok(())
    }
}
