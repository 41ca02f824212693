//! Threshold Alert Rules
//!
//! Value and time hysteresis for telemetry channel alerts:
//! - Per-rule trigger band with independent activation and deactivation
//!   persistence windows
//! - Ordered per-channel rule collections with a master enable
//! - TOML configuration loading with construction-time validation

mod collection;
mod config;
mod rule;

pub use collection::AlertRuleCollection;
pub use rule::{AlertRule, RuleTransition};
pub use self::config::{AlertConfigError, AlertsConfig, ChannelConfig, RuleConfig};
