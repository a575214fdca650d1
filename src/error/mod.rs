//! Error handling module

use std::fmt;

use thiserror::Error;

use crate::monitor::report;

/// Which half of the token lifecycle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Login,
    Refresh,
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStage::Login => write!(f, "login"),
            AuthStage::Refresh => write!(f, "refresh"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Auth {stage} failed with HTTP {status}")]
    Auth { stage: AuthStage, status: u16 },

    #[error("Devices request failed with HTTP {status}")]
    Fetch { status: u16 },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BotError {
    /// Text sent to the chat when this error ends an operation
    pub fn user_message(&self) -> String {
        match self {
            BotError::Auth {
                stage: AuthStage::Login,
                status,
            } => format!("{} {}", report::LOGIN_FAILED, status),
            BotError::Auth {
                stage: AuthStage::Refresh,
                status,
            } => format!("{} {}", report::REFRESH_FAILED, status),
            BotError::Fetch { .. } => report::FETCH_FAILED.to_string(),
            BotError::Transport(_) | BotError::Telegram(_) | BotError::Config(_) => {
                report::GENERIC_FAILURE.to_string()
            }
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, BotError::Auth { .. })
    }
}
