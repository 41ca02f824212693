//! Telemetry Alert Monitor
//!
//! Routes channel samples to threshold rule collections and emits alert
//! events for a notification layer:
//! - One rule collection per telemetry channel
//! - Serialized asynchronous sample feed
//! - Owned, serializable alert events with wall-clock timestamps

mod feed;
mod monitor;

pub use feed::run;
pub use monitor::{AlertEvent, AlertEventKind, AlertMonitor, Sample};
