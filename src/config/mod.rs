//! Configuration module
//!
//! Sources, lowest priority first:
//! - `config/default.{toml,yaml,json}` (optional)
//! - `IPEYE_WATCH__<SECTION>__<KEY>` environment variables
//! - legacy `TELEGRAM_BOT_KEY`, `LOGIN`, `PASSWORD` variables
//!
//! A `.env` file in the working directory is loaded into the environment first.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::BotError;
use crate::models::Credentials;
use crate::scheduler::JobMode;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Default, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"***")
            .finish()
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("login", &self.login)
            .field("password", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default)]
    pub first_delay_secs: u64,
    #[serde(default)]
    pub job_mode: JobMode,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            first_delay_secs: 0,
            job_mode: JobMode::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://ipeye.ru".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_interval_secs() -> u64 {
    600
}

impl Config {
    pub fn load() -> Result<Self, BotError> {
        if dotenv::dotenv().is_ok() {
            tracing::debug!("Loaded .env file");
        }

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("IPEYE_WATCH").separator("__"))
            .set_override_option("telegram.bot_token", std::env::var("TELEGRAM_BOT_KEY").ok())
            .and_then(|b| b.set_override_option("api.login", std::env::var("LOGIN").ok()))
            .and_then(|b| b.set_override_option("api.password", std::env::var("PASSWORD").ok()))
            .map_err(|e| BotError::Config(e.to_string()))?;

        let settings = builder
            .build()
            .map_err(|e| BotError::Config(e.to_string()))?;

        Self::from_settings(settings)
    }

    /// Deserialize and validate an already-built settings tree
    pub fn from_settings(settings: config::Config) -> Result<Self, BotError> {
        let config: Config = settings
            .try_deserialize()
            .map_err(|e| BotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), BotError> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(BotError::Config("telegram bot token is not set".to_string()));
        }
        if self.api.login.is_empty() || self.api.password.is_empty() {
            return Err(BotError::Config("API login/password are not set".to_string()));
        }
        if self.poll.interval_secs == 0 {
            return Err(BotError::Config("poll interval must be positive".to_string()));
        }
        Url::parse(&self.api.base_url)
            .map_err(|e| BotError::Config(format!("invalid API base URL: {}", e)))?;
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            login: self.api.login.clone(),
            password: self.api.password.clone(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs)
    }

    pub fn first_delay(&self) -> Duration {
        Duration::from_secs(self.poll.first_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}
