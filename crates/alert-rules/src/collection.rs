//! Rule Collection Implementation

use crate::rule::{AlertRule, RuleTransition};
use std::time::Instant;

/// An ordered group of rules monitoring a single channel.
///
/// Rules are evaluated in their declared order and the transition lists
/// preserve that order. The collection-level `enabled` switch is a master
/// cut-off: while it is false no member rule is evaluated, so member
/// persistence windows stay frozen. A disabled member rule, in contrast,
/// keeps its windows running and only stops reporting activation.
#[derive(Debug, Clone)]
pub struct AlertRuleCollection {
    /// Monitored channel name
    name: String,
    /// Master switch for the whole collection
    enabled: bool,
    /// Member rules in evaluation order
    rules: Vec<AlertRule>,
}

impl AlertRuleCollection {
    /// Create a collection for `name` with rules in evaluation order
    pub fn new(name: impl Into<String>, enabled: bool, rules: Vec<AlertRule>) -> Self {
        Self {
            name: name.into(),
            enabled,
            rules,
        }
    }

    /// Evaluate every rule against `value` at the current time.
    ///
    /// Returns the rules that activated and the rules that deactivated on
    /// this check, both in collection order. A disabled collection returns
    /// empty lists without evaluating any rule.
    pub fn check_rules(&mut self, value: f64) -> (Vec<&AlertRule>, Vec<&AlertRule>) {
        self.check_rules_at(value, Instant::now())
    }

    /// Evaluate every rule against `value` at an explicit point in time.
    ///
    /// All member rules observe the same `now`.
    pub fn check_rules_at(
        &mut self,
        value: f64,
        now: Instant,
    ) -> (Vec<&AlertRule>, Vec<&AlertRule>) {
        if !self.enabled {
            return (Vec::new(), Vec::new());
        }

        let transitions: Vec<RuleTransition> = self
            .rules
            .iter_mut()
            .map(|rule| rule.tick(value, now))
            .collect();

        let mut activated = Vec::new();
        let mut deactivated = Vec::new();
        for (rule, transition) in self.rules.iter().zip(transitions) {
            match transition {
                RuleTransition::Activated => activated.push(rule),
                RuleTransition::Deactivated => deactivated.push(rule),
                RuleTransition::NoChange => {}
            }
        }
        (activated, deactivated)
    }

    /// Monitored channel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the collection evaluates its rules
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the whole collection
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Member rules in evaluation order
    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// Number of member rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the collection has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
