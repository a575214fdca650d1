//! Data models for ipeye-watch

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Credentials / Tokens
// ============================================================================

/// Long-lived account credentials, loaded once at startup
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Short-lived bearer token. Never stored in session state.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(***)")
    }
}

/// `message` payload of login/refresh responses
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub message: T,
}

// ============================================================================
// Devices
// ============================================================================

/// A monitored camera. `status == false` means unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    pub name: String,
    pub status: bool,
}

#[derive(Debug, Deserialize)]
pub struct DevicesResponse {
    pub status: bool,
    #[serde(default)]
    pub message: Vec<Device>,
}

/// Devices from one HTTP 200 devices response. `accepted` mirrors the
/// envelope `status` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceList {
    pub accepted: bool,
    pub devices: Vec<Device>,
}

impl DeviceList {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            accepted: true,
            devices,
        }
    }

    pub fn with_status(accepted: bool, devices: Vec<Device>) -> Self {
        Self { accepted, devices }
    }

    /// Devices reporting unavailable, in API order
    pub fn unavailable(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| !d.status)
    }

    /// True for an empty list as well
    pub fn all_available(&self) -> bool {
        self.unavailable().next().is_none()
    }
}
