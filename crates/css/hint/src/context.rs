//! Validated rule configuration and the immutable context a rule evaluates against.

use crate::util::line_content;
use anyhow::{Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// A configured minimum, always finite and strictly positive.
///
/// Configuration hands thresholds over loosely typed (`12`, `"12"`, `null`);
/// they are narrowed here once so rule code never sees an invalid number.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Deserialize)]
#[serde(try_from = "Value")]
pub struct Threshold(f32);

impl Threshold {
    /// Accept `value` when it is finite and greater than zero.
    pub fn new(value: f32) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    /// The raw threshold.
    pub const fn get(self) -> f32 {
        self.0
    }

    /// Narrow a raw configuration value. Numbers and numeric strings are
    /// accepted; everything else (including `null` and `""`) disables the rule.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_f64().and_then(|raw| Self::new(raw as f32)),
            Value::String(text) => text.parse().ok(),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Strict comparison: a magnitude equal to the threshold is compliant.
    pub fn is_violated_by(self, magnitude: f32) -> bool {
        magnitude < self.0
    }
}

impl FromStr for Threshold {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let raw: f32 = trimmed
            .parse()
            .map_err(|err| anyhow!("`{trimmed}` is not a number: {err}"))?;
        Self::new(raw).ok_or_else(|| anyhow!("threshold must be positive and finite, got {raw}"))
    }
}

impl TryFrom<Value> for Threshold {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value).ok_or_else(|| anyhow!("invalid threshold: {value}"))
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Everything a rule needs to evaluate events, bound once at registration.
#[derive(Clone, Debug)]
pub struct RuleContext {
    file_content: Rc<str>,
    rule_name: String,
    threshold: Threshold,
}

impl RuleContext {
    pub fn new(file_content: Rc<str>, rule_name: impl Into<String>, threshold: Threshold) -> Self {
        Self {
            file_content,
            rule_name: rule_name.into(),
            threshold,
        }
    }

    /// Full text of the stylesheet under check.
    pub fn file_content(&self) -> &str {
        &self.file_content
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Content of the 1-based `line`, if it exists.
    pub fn line(&self, line: u32) -> Option<&str> {
        line_content(&self.file_content, line)
    }
}
