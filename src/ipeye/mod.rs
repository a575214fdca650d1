//! IPEYE REST API integration module
//!
//! - `client`: Low-level HTTP calls (login, refresh, devices)
//! - `session`: Access/refresh token lifecycle

pub mod client;
pub mod session;

pub use client::IpeyeClient;
pub use session::SessionManager;
