//! Device availability monitoring
//!
//! - `poll`: One check-and-notify cycle plus the on-demand status query
//! - `report`: Chat message texts

pub mod poll;
pub mod report;

pub use poll::PollCycle;
