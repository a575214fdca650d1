//! Session manager: login once, then rotate the refresh token on every call

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::BotError;
use crate::ipeye::client::IpeyeClient;
use crate::models::{AccessToken, Credentials};

/// `refresh_token == None` is the first-login state. There is no path back
/// to it once a login succeeds.
#[derive(Debug, Default)]
pub struct SessionState {
    refresh_token: Option<String>,
}

impl SessionState {
    #[cfg(test)]
    pub fn is_first_login(&self) -> bool {
        self.refresh_token.is_none()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }
}

pub struct SessionManager {
    client: Arc<IpeyeClient>,
    credentials: Credentials,
    // Held across the whole exchange so only one caller rotates at a time.
    state: Mutex<SessionState>,
}

impl SessionManager {
    pub fn new(client: Arc<IpeyeClient>, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Login on first use, refresh afterwards. Failures leave the state untouched.
    pub async fn obtain_access_token(&self) -> Result<AccessToken, BotError> {
        let mut state = self.state.lock().await;

        let pair = match state.refresh_token() {
            None => {
                let pair = self.client.login(&self.credentials).await.map_err(|e| {
                    tracing::warn!("[Session] Login failed: {}", e);
                    e
                })?;
                tracing::info!("[Session] Logged in as {}", self.credentials.login);
                pair
            }
            Some(refresh_token) => {
                let pair = self.client.refresh(refresh_token).await.map_err(|e| {
                    tracing::warn!("[Session] Token refresh failed: {}", e);
                    e
                })?;
                tracing::debug!("[Session] Token refreshed");
                pair
            }
        };

        state.refresh_token = Some(pair.refresh_token);
        Ok(AccessToken::new(pair.access_token))
    }

    #[cfg(test)]
    pub async fn is_first_login(&self) -> bool {
        self.state.lock().await.is_first_login()
    }

    #[cfg(test)]
    pub async fn refresh_token(&self) -> Option<String> {
        self.state.lock().await.refresh_token().map(String::from)
    }
}
