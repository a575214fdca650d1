//! ipeye-watch - IPEYE camera availability bot
//!
//! Polls the IPEYE device-monitoring API on a schedule and relays
//! unavailable cameras to Telegram chats.

mod bot;
mod config;
mod error;
mod ipeye;
mod models;
mod monitor;
mod notify;
mod scheduler;

#[cfg(test)]
mod testutil;

use std::sync::Arc;

use teloxide::Bot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::BotState;
use crate::ipeye::{IpeyeClient, SessionManager};
use crate::monitor::PollCycle;
use crate::notify::{Notifier, TelegramNotifier};
use crate::scheduler::PollScheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ipeye_watch=info".into()),
        )
        .init();

    tracing::info!("Starting ipeye-watch...");

    // Load configuration
    let config = config::Config::load()?;
    tracing::info!(
        "Configuration loaded: api={}, interval={}s, job_mode={:?}",
        config.api.base_url,
        config.poll.interval_secs,
        config.poll.job_mode
    );

    let client = Arc::new(IpeyeClient::new(
        &config.api.base_url,
        config.request_timeout(),
    )?);
    let session = Arc::new(SessionManager::new(client.clone(), config.credentials()));

    let bot = Bot::new(config.telegram.bot_token.clone());
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(bot.clone()));

    let poll = Arc::new(PollCycle::new(session, client, notifier.clone()));
    let scheduler = Arc::new(PollScheduler::new(
        poll.clone(),
        config.poll_interval(),
        config.first_delay(),
        config.poll.job_mode,
    ));

    let state = BotState {
        poll,
        scheduler,
        notifier,
    };

    bot::run(bot, state).await;

    tracing::info!("Shutting down");
    Ok(())
}
