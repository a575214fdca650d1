//! PollCycle: token → devices → chat notifications

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::types::ChatId;

use crate::error::BotError;
use crate::ipeye::{IpeyeClient, SessionManager};
use crate::models::DeviceList;
use crate::monitor::report;
use crate::notify::Notifier;
use crate::scheduler::ChatJob;

pub struct PollCycle {
    session: Arc<SessionManager>,
    client: Arc<IpeyeClient>,
    notifier: Arc<dyn Notifier>,
}

impl PollCycle {
    pub fn new(
        session: Arc<SessionManager>,
        client: Arc<IpeyeClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            client,
            notifier,
        }
    }

    /// Token acquisition followed by the device fetch
    pub async fn fetch(&self) -> Result<DeviceList, BotError> {
        let token = self.session.obtain_access_token().await?;
        self.client.fetch_devices(&token).await
    }

    /// One periodic check for `chat_id`
    pub async fn run_once(&self, chat_id: ChatId) {
        let token = match self.session.obtain_access_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("[Poll] Chat {}: token unavailable: {}", chat_id, e);
                // Auth failures report the status first, then the generic notice
                if e.is_auth() {
                    self.notify(chat_id, &e.user_message()).await;
                }
                self.notify(chat_id, report::GENERIC_FAILURE).await;
                return;
            }
        };

        let devices = match self.client.fetch_devices(&token).await {
            Ok(devices) => devices,
            Err(e) => {
                tracing::warn!("[Poll] Chat {}: device fetch failed: {}", chat_id, e);
                self.notify(chat_id, &e.user_message()).await;
                return;
            }
        };

        if !devices.accepted {
            // Envelope status=false: no per-device check, reported as all good
            tracing::warn!("[Poll] Chat {}: devices response not accepted", chat_id);
            self.notify(chat_id, report::ALL_AVAILABLE).await;
            return;
        }

        for device in devices.unavailable() {
            self.notify(chat_id, &report::device_unavailable(&device.name))
                .await;
        }

        if devices.all_available() {
            self.notify(chat_id, report::ALL_AVAILABLE).await;
        }

        tracing::info!(
            "[Poll] Chat {}: {} devices, {} unavailable",
            chat_id,
            devices.devices.len(),
            devices.unavailable().count()
        );
    }

    /// Text for the on-demand status query
    pub async fn status_report(&self) -> String {
        let result = self.fetch().await;
        if let Err(ref e) = result {
            tracing::warn!("[Poll] Status query failed: {}", e);
        }
        report::stores_summary(&result)
    }

    async fn notify(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.notifier.send(chat_id, text).await {
            tracing::warn!("[Poll] Failed to notify chat {}: {}", chat_id, e);
        }
    }
}

#[async_trait]
impl ChatJob for PollCycle {
    async fn run(&self, chat_id: ChatId) {
        self.run_once(chat_id).await;
    }
}
