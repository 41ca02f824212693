//! Alert Monitor Implementation

use alert_rules::{AlertConfigError, AlertRule, AlertRuleCollection, AlertsConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Kind of alert transition carried by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertEventKind {
    /// A rule's in-band window matured
    Activated,
    /// A rule's out-of-band window matured
    Deactivated,
}

/// One telemetry observation for a channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Channel name
    pub channel: String,
    /// Observed value
    pub value: f64,
}

/// Notification emitted when a rule changes state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Channel the rule belongs to
    pub channel: String,
    /// Transition kind
    pub kind: AlertEventKind,
    /// Value that drove the transition
    pub value: f64,
    /// Lower edge of the rule's trigger band
    pub threshold_min: f64,
    /// Upper edge of the rule's trigger band
    pub threshold_max: f64,
    /// Wall-clock time the transition was observed
    pub timestamp: DateTime<Utc>,
}

/// Routes channel samples to their rule collections and emits alert events.
///
/// Rule decisions run on the monotonic clock; events carry a wall-clock
/// timestamp for downstream consumers.
pub struct AlertMonitor {
    /// One collection per channel, in configuration order
    collections: Vec<AlertRuleCollection>,
}

impl AlertMonitor {
    /// Create a monitor from pre-built collections
    pub fn new(collections: Vec<AlertRuleCollection>) -> Self {
        info!("alert monitor created with {} channels", collections.len());
        Self { collections }
    }

    /// Build a monitor from a validated configuration
    pub fn from_config(config: &AlertsConfig) -> Result<Self, AlertConfigError> {
        Ok(Self::new(config.build_collections()?))
    }

    /// Evaluate one sample at the current time
    pub fn ingest(&mut self, channel: &str, value: f64) -> Vec<AlertEvent> {
        self.ingest_at(channel, value, Instant::now())
    }

    /// Evaluate one sample at an explicit point in time.
    ///
    /// Returns the events for every rule transition on this tick,
    /// activations first, each group in collection order. Samples for
    /// unmonitored channels produce no events.
    pub fn ingest_at(&mut self, channel: &str, value: f64, now: Instant) -> Vec<AlertEvent> {
        let collection = match self.collections.iter_mut().find(|c| c.name() == channel) {
            Some(collection) => collection,
            None => {
                debug!("ignoring sample for unmonitored channel '{}'", channel);
                return Vec::new();
            }
        };

        let timestamp = Utc::now();
        let (activated, deactivated) = collection.check_rules_at(value, now);

        let mut events = Vec::with_capacity(activated.len() + deactivated.len());
        for rule in activated {
            events.push(Self::event(
                channel,
                AlertEventKind::Activated,
                value,
                rule,
                timestamp,
            ));
        }
        for rule in deactivated {
            events.push(Self::event(
                channel,
                AlertEventKind::Deactivated,
                value,
                rule,
                timestamp,
            ));
        }
        if !events.is_empty() {
            debug!("channel '{}' produced {} alert events", channel, events.len());
        }
        events
    }

    fn event(
        channel: &str,
        kind: AlertEventKind,
        value: f64,
        rule: &AlertRule,
        timestamp: DateTime<Utc>,
    ) -> AlertEvent {
        AlertEvent {
            channel: channel.to_string(),
            kind,
            value,
            threshold_min: rule.threshold_min(),
            threshold_max: rule.threshold_max(),
            timestamp,
        }
    }

    /// Monitored channel names in configuration order
    pub fn channels(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.name()).collect()
    }

    /// Access a channel's collection by name
    pub fn collection(&self, channel: &str) -> Option<&AlertRuleCollection> {
        self.collections.iter().find(|c| c.name() == channel)
    }

    /// Mutable access to a channel's collection by name
    pub fn collection_mut(&mut self, channel: &str) -> Option<&mut AlertRuleCollection> {
        self.collections.iter_mut().find(|c| c.name() == channel)
    }
}
