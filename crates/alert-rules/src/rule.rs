//! Threshold Rule Implementation

use std::time::{Duration, Instant};

/// Outcome of evaluating one sample against a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTransition {
    /// No confirmed state change
    NoChange,
    /// The in-band window matured; the rule just became active
    Activated,
    /// The out-of-band window matured; the rule is confirmed inactive
    Deactivated,
}

/// A threshold rule with value and time hysteresis.
///
/// The band `[threshold_min, threshold_max]` is the trigger band, inclusive
/// at both edges. A value inside the band must persist for `time_on` before
/// the rule activates; a value outside it must persist for `time_off` before
/// the rule deactivates. An excursion shorter than the matching window
/// resets that window without a state change.
///
/// Activation is reported once per in-band episode. Deactivation is reported
/// on every check once the out-of-band window has matured, whether or not
/// the rule ever activated.
#[derive(Debug, Clone)]
pub struct AlertRule {
    /// Whether the rule may report activation
    enabled: bool,
    /// Lower edge of the trigger band (inclusive)
    threshold_min: f64,
    /// Upper edge of the trigger band (inclusive)
    threshold_max: f64,
    /// Continuous in-band time required to activate
    time_on: Duration,
    /// Continuous out-of-band time required to deactivate
    time_off: Duration,
    /// Confirmed active state
    active: bool,
    /// Start of the current uninterrupted in-band run
    in_band_since: Option<Instant>,
    /// Start of the current uninterrupted out-of-band run
    out_of_band_since: Option<Instant>,
}

impl AlertRule {
    /// Create a new rule.
    ///
    /// Values are taken as-is; range and finiteness checks belong to the
    /// configuration loader. A rule built with `threshold_min > threshold_max`
    /// matches no value and can only report deactivation.
    pub fn new(
        enabled: bool,
        threshold_min: f64,
        threshold_max: f64,
        time_on: Duration,
        time_off: Duration,
    ) -> Self {
        Self {
            enabled,
            threshold_min,
            threshold_max,
            time_on,
            time_off,
            active: false,
            in_band_since: None,
            out_of_band_since: None,
        }
    }

    /// Check whether a value falls inside the trigger band.
    ///
    /// Both edges are inclusive. NaN is never inside the band.
    pub fn is_within_threshold(&self, value: f64) -> bool {
        self.threshold_min <= value && value <= self.threshold_max
    }

    /// Evaluate the activation side of the rule at `now`.
    ///
    /// Returns true exactly once per in-band episode: on the first check
    /// where the value has stayed inside the band for at least `time_on`
    /// while the rule is enabled and not already active. The first in-band
    /// observation only arms the window; it never fires. An out-of-band
    /// value resets the window.
    pub fn should_activate(&mut self, value: f64, now: Instant) -> bool {
        if !self.is_within_threshold(value) {
            self.in_band_since = None;
            return false;
        }
        match self.in_band_since {
            None => {
                self.in_band_since = Some(now);
                false
            }
            Some(since) => {
                let fire =
                    self.enabled && !self.active && now.duration_since(since) >= self.time_on;
                if fire {
                    self.active = true;
                }
                fire
            }
        }
    }

    /// Evaluate the deactivation side of the rule at `now`.
    ///
    /// Returns true on every check where the value has stayed outside the
    /// band for at least `time_off`. The first out-of-band observation only
    /// arms the window; an in-band value resets it. Deactivation is not
    /// gated by `enabled` or by a prior activation, and a matured window
    /// keeps reporting until the value returns to the band.
    pub fn should_deactivate(&mut self, value: f64, now: Instant) -> bool {
        if self.is_within_threshold(value) {
            self.out_of_band_since = None;
            return false;
        }
        match self.out_of_band_since {
            None => {
                self.out_of_band_since = Some(now);
                false
            }
            Some(since) => {
                let fire = now.duration_since(since) >= self.time_off;
                if fire {
                    self.active = false;
                }
                fire
            }
        }
    }

    /// Evaluate one sample and report the confirmed transition, if any.
    ///
    /// Both sides of the rule run on every tick so that each call maintains
    /// both windows; a single value can satisfy at most one of them.
    pub fn tick(&mut self, value: f64, now: Instant) -> RuleTransition {
        let activated = self.should_activate(value, now);
        let deactivated = self.should_deactivate(value, now);
        if activated {
            RuleTransition::Activated
        } else if deactivated {
            RuleTransition::Deactivated
        } else {
            RuleTransition::NoChange
        }
    }

    /// Whether the rule may report activation
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable activation reporting.
    ///
    /// Both persistence windows keep running while the rule is disabled, so
    /// re-enabling over a matured in-band window fires on the next check.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Confirmed active state
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Lower edge of the trigger band
    pub fn threshold_min(&self) -> f64 {
        self.threshold_min
    }

    /// Upper edge of the trigger band
    pub fn threshold_max(&self) -> f64 {
        self.threshold_max
    }

    /// Continuous in-band time required to activate
    pub fn time_on(&self) -> Duration {
        self.time_on
    }

    /// Continuous out-of-band time required to deactivate
    pub fn time_off(&self) -> Duration {
        self.time_off
    }
}
