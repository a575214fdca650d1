//! Telegram command surface

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;

use crate::error::BotError;
use crate::monitor::{report, PollCycle};
use crate::notify::Notifier;
use crate::scheduler::PollScheduler;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "список магазинов с недоступными камерами")]
    GetStores,
    #[command(description = "начать периодическую проверку")]
    StartCheck,
    #[command(description = "остановить периодическую проверку")]
    StopCheck,
    #[command(description = "показать эту справку")]
    Help,
}

/// Shared bot state passed to all handlers.
#[derive(Clone)]
pub struct BotState {
    pub poll: Arc<PollCycle>,
    pub scheduler: Arc<PollScheduler>,
    pub notifier: Arc<dyn Notifier>,
}

impl BotState {
    /// Run `command` for `chat_id` and send the reply
    pub async fn execute(&self, chat_id: ChatId, command: Command) -> Result<(), BotError> {
        let reply = match command {
            Command::GetStores => self.poll.status_report().await,
            Command::StartCheck => {
                let outcome = self.scheduler.start(chat_id).await;
                let running = self.scheduler.active_jobs(chat_id).await;
                if running > 1 {
                    tracing::warn!(
                        "[Bot] Chat {} now has {} poll jobs ({:?})",
                        chat_id,
                        running,
                        outcome
                    );
                }
                report::check_started(self.scheduler.interval())
            }
            Command::StopCheck => {
                if self.scheduler.stop(chat_id).await > 0 {
                    report::CHECK_STOPPED.to_string()
                } else {
                    report::CHECK_NOT_RUNNING.to_string()
                }
            }
            Command::Help => Command::descriptions().to_string(),
        };

        self.notifier.send(chat_id, &reply).await
    }
}

async fn handle_command(msg: Message, command: Command, state: BotState) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    tracing::info!("[Bot] Chat {}: {:?}", chat_id, command);

    if let Err(e) = state.execute(chat_id, command).await {
        tracing::warn!("[Bot] Chat {}: reply failed: {}", chat_id, e);
    }
    Ok(())
}

/// Register commands and dispatch updates until Ctrl-C
pub async fn run(bot: Bot, state: BotState) {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("[Bot] Failed to register command list: {}", e);
    }

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command);

    tracing::info!("[Bot] Bot started");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
