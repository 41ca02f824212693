//! Alert configuration

use crate::collection::AlertRuleCollection;
use crate::rule::AlertRule;
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading or validating alert configuration
#[derive(Error, Debug)]
pub enum AlertConfigError {
    /// Threshold band is not an ordered pair of finite values
    #[error("channel '{channel}' rule {index}: invalid threshold band [{min}, {max}]")]
    InvalidBand {
        channel: String,
        index: usize,
        min: f64,
        max: f64,
    },

    /// Persistence window is negative, not finite, or too large
    #[error("channel '{channel}' rule {index}: invalid {field} of {value} seconds")]
    InvalidDuration {
        channel: String,
        index: usize,
        field: &'static str,
        value: f64,
    },

    /// Channel entry with an empty name
    #[error("channel name must not be empty")]
    EmptyChannelName,

    /// Two channel entries share a name
    #[error("duplicate channel '{0}'")]
    DuplicateChannel(String),

    /// Underlying configuration source failed to load or parse
    #[error("configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),
}

fn default_enabled() -> bool {
    true
}

/// One threshold rule entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether the rule may report activation (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Lower edge of the trigger band (inclusive)
    pub threshold_min: f64,
    /// Upper edge of the trigger band (inclusive)
    pub threshold_max: f64,
    /// Continuous in-band time required to activate (seconds)
    pub time_on_secs: f64,
    /// Continuous out-of-band time required to deactivate (seconds)
    pub time_off_secs: f64,
}

impl RuleConfig {
    // Callers validate first; every window that reaches this point is
    // representable as a Duration.
    fn build(&self) -> AlertRule {
        AlertRule::new(
            self.enabled,
            self.threshold_min,
            self.threshold_max,
            Duration::from_secs_f64(self.time_on_secs),
            Duration::from_secs_f64(self.time_off_secs),
        )
    }
}

/// Rules for one monitored channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channel name, unique across the configuration
    pub name: String,
    /// Whether the channel is evaluated at all (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Rules in evaluation order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl ChannelConfig {
    fn build(&self) -> AlertRuleCollection {
        let rules = self.rules.iter().map(RuleConfig::build).collect();
        AlertRuleCollection::new(self.name.clone(), self.enabled, rules)
    }
}

/// Full alert configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Monitored channels in evaluation order
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

impl AlertsConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AlertConfigError> {
        let cfg: AlertsConfig = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        info!("loaded alert configuration with {} channels", cfg.channels.len());
        Ok(cfg)
    }

    /// Load and validate configuration from a TOML string
    pub fn from_toml_str(raw: &str) -> Result<Self, AlertConfigError> {
        let cfg: AlertsConfig = Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate thresholds, windows, and channel names.
    ///
    /// The runtime engine performs no validation of its own; every
    /// constraint on rule parameters is enforced here.
    pub fn validate(&self) -> Result<(), AlertConfigError> {
        let mut seen = HashSet::new();
        for channel in &self.channels {
            if channel.name.is_empty() {
                return Err(AlertConfigError::EmptyChannelName);
            }
            if !seen.insert(channel.name.as_str()) {
                return Err(AlertConfigError::DuplicateChannel(channel.name.clone()));
            }
            for (index, rule) in channel.rules.iter().enumerate() {
                if !rule.threshold_min.is_finite()
                    || !rule.threshold_max.is_finite()
                    || rule.threshold_min > rule.threshold_max
                {
                    return Err(AlertConfigError::InvalidBand {
                        channel: channel.name.clone(),
                        index,
                        min: rule.threshold_min,
                        max: rule.threshold_max,
                    });
                }
                for (field, value) in [
                    ("time_on_secs", rule.time_on_secs),
                    ("time_off_secs", rule.time_off_secs),
                ] {
                    // Rejects NaN, infinite, negative, and values too large
                    // to represent as a Duration.
                    if Duration::try_from_secs_f64(value).is_err() {
                        return Err(AlertConfigError::InvalidDuration {
                            channel: channel.name.clone(),
                            index,
                            field,
                            value,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Build runtime collections in declared channel order
    pub fn build_collections(&self) -> Result<Vec<AlertRuleCollection>, AlertConfigError> {
        self.validate()?;
        Ok(self.channels.iter().map(ChannelConfig::build).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[channels]]
        name = "RPM"

        [[channels.rules]]
        threshold_min = 6500.0
        threshold_max = 8000.0
        time_on_secs = 0.5
        time_off_secs = 2.0

        [[channels]]
        name = "EngineTemp"
        enabled = false

        [[channels.rules]]
        enabled = false
        threshold_min = 110.0
        threshold_max = 150.0
        time_on_secs = 5.0
        time_off_secs = 10.0
    "#;

    fn rule_cfg() -> RuleConfig {
        RuleConfig {
            enabled: true,
            threshold_min: 0.0,
            threshold_max: 100.0,
            time_on_secs: 1.0,
            time_off_secs: 1.0,
        }
    }

    fn single_channel(rule: RuleConfig) -> AlertsConfig {
        AlertsConfig {
            channels: vec![ChannelConfig {
                name: "RPM".to_string(),
                enabled: true,
                rules: vec![rule],
            }],
        }
    }

    #[test]
    fn test_load_from_toml() {
        let cfg = AlertsConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(cfg.channels.len(), 2);
        assert_eq!(cfg.channels[0].name, "RPM");
        assert!(cfg.channels[0].enabled);
        assert_eq!(cfg.channels[0].rules.len(), 1);
        assert!(cfg.channels[0].rules[0].enabled);
        assert!(!cfg.channels[1].enabled);
        assert!(!cfg.channels[1].rules[0].enabled);
    }

    #[test]
    fn test_build_collections_in_declared_order() {
        let cfg = AlertsConfig::from_toml_str(SAMPLE).unwrap();
        let collections = cfg.build_collections().unwrap();
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0].name(), "RPM");
        assert_eq!(collections[1].name(), "EngineTemp");
        assert!(collections[0].enabled());
        assert!(!collections[1].enabled());

        let rule = &collections[0].rules()[0];
        assert_eq!(rule.threshold_min(), 6500.0);
        assert_eq!(rule.threshold_max(), 8000.0);
        assert_eq!(rule.time_on(), Duration::from_millis(500));
        assert_eq!(rule.time_off(), Duration::from_secs(2));
    }

    #[test]
    fn test_rejects_inverted_band() {
        let cfg = single_channel(RuleConfig {
            threshold_min: 100.0,
            threshold_max: 0.0,
            ..rule_cfg()
        });
        assert!(matches!(
            cfg.validate(),
            Err(AlertConfigError::InvalidBand { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_threshold() {
        let cfg = single_channel(RuleConfig {
            threshold_max: f64::INFINITY,
            ..rule_cfg()
        });
        assert!(matches!(
            cfg.validate(),
            Err(AlertConfigError::InvalidBand { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_window() {
        let cfg = single_channel(RuleConfig {
            time_off_secs: -1.0,
            ..rule_cfg()
        });
        assert!(matches!(
            cfg.validate(),
            Err(AlertConfigError::InvalidDuration {
                field: "time_off_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_nan_window() {
        let cfg = single_channel(RuleConfig {
            time_on_secs: f64::NAN,
            ..rule_cfg()
        });
        assert!(matches!(
            cfg.validate(),
            Err(AlertConfigError::InvalidDuration { .. })
        ));
    }

    // A finite window beyond Duration range must fail loading, not panic
    // later when collections are built.
    #[test]
    fn test_rejects_oversized_window() {
        let raw = r#"
            [[channels]]
            name = "RPM"

            [[channels.rules]]
            threshold_min = 0.0
            threshold_max = 100.0
            time_on_secs = 1.0e20
            time_off_secs = 1.0
        "#;
        assert!(matches!(
            AlertsConfig::from_toml_str(raw),
            Err(AlertConfigError::InvalidDuration {
                field: "time_on_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_empty_channel_name() {
        let mut cfg = single_channel(rule_cfg());
        cfg.channels[0].name.clear();
        assert!(matches!(
            cfg.validate(),
            Err(AlertConfigError::EmptyChannelName)
        ));
    }

    #[test]
    fn test_rejects_duplicate_channel() {
        let mut cfg = single_channel(rule_cfg());
        cfg.channels.push(cfg.channels[0].clone());
        assert!(matches!(
            cfg.validate(),
            Err(AlertConfigError::DuplicateChannel(_))
        ));
    }

    #[test]
    fn test_invalid_toml_reports_load_error() {
        assert!(matches!(
            AlertsConfig::from_toml_str("channels = 5"),
            Err(AlertConfigError::Load(_))
        ));
    }
}
