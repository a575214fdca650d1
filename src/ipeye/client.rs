//! IPEYE REST API client

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use url::Url;

use crate::error::{AuthStage, BotError};
use crate::models::{
    AccessToken, ApiEnvelope, Credentials, DeviceList, DevicesResponse, RefreshRequest, TokenPair,
};

const LOGIN_PATH: &str = "/api/rest/users/login";
const REFRESH_PATH: &str = "/api/rest/users/refresh";
const DEVICES_PATH: &str = "/api/rest/devices";

pub struct IpeyeClient {
    base_url: String,
    http_client: Client,
}

impl IpeyeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BotError> {
        Url::parse(base_url)
            .map_err(|e| BotError::Config(format!("invalid API base URL: {}", e)))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange login/password for a token pair
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, BotError> {
        self.post_tokens(LOGIN_PATH, credentials, AuthStage::Login)
            .await
    }

    /// Exchange a refresh token for a new pair. The old refresh token is
    /// invalid afterwards.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, BotError> {
        self.post_tokens(
            REFRESH_PATH,
            &RefreshRequest { refresh_token },
            AuthStage::Refresh,
        )
        .await
    }

    async fn post_tokens<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        stage: AuthStage,
    ) -> Result<TokenPair, BotError> {
        let resp = self
            .http_client
            .post(self.url(path))
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(BotError::Auth {
                stage,
                status: status.as_u16(),
            });
        }

        let envelope: ApiEnvelope<TokenPair> = resp.json().await?;
        Ok(envelope.message)
    }

    /// Current device list. An expired token surfaces as `BotError::Fetch`;
    /// an envelope with `status: false` is returned as a non-accepted list.
    pub async fn fetch_devices(&self, token: &AccessToken) -> Result<DeviceList, BotError> {
        let resp = self
            .http_client
            .get(self.url(DEVICES_PATH))
            .header(ACCEPT, "application/json")
            .bearer_auth(token.as_str())
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(BotError::Fetch {
                status: status.as_u16(),
            });
        }

        let body: DevicesResponse = resp.json().await?;
        if !body.status {
            tracing::warn!("[IPEYE] Devices response has status=false");
        }

        tracing::debug!("[IPEYE] Fetched {} devices", body.message.len());
        Ok(DeviceList::with_status(body.status, body.message))
    }
}
