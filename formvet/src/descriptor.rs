//! Declarative rule descriptors attached to fields.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of a validation rule kind, e.g. `"min_length"`.
///
/// Kinds are plain strings so rule sets can be built from data as well as
/// code. Built-in kinds are exposed as constants in
/// [`validators`](crate::validators).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleKind(Cow<'static, str>);

impl RuleKind {
    /// Create a rule kind from a static string.
    pub const fn from_static(kind: &'static str) -> Self {
        Self(Cow::Borrowed(kind))
    }

    /// Create a rule kind from an owned or borrowed string.
    pub fn new(kind: impl Into<String>) -> Self {
        Self(Cow::Owned(kind.into()))
    }

    /// Get the kind as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RuleKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RuleKind {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed rule parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean parameter.
    Flag(bool),
    /// Integer parameter.
    Int(i64),
    /// Floating-point parameter.
    Float(f64),
    /// String parameter.
    Text(String),
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<usize> for ParamValue {
    fn from(i: usize) -> Self {
        Self::Int(i as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A single validation rule attached to a field.
///
/// Descriptors are pure data: a kind naming the validator, an order used to
/// sort failures across the whole target, an optional message override, and
/// kind-specific parameters. Built-in descriptors are created via the
/// constructor functions in [`validators`](crate::validators), e.g.
/// `min_length(3).order(1).message("Too short")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    /// The validator kind this rule binds to.
    pub kind: RuleKind,
    /// Sort key for failures; lower orders are reported first.
    #[serde(default)]
    pub order: i32,
    /// Message override; takes precedence over context templates and the
    /// validator's default.
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    params: BTreeMap<String, ParamValue>,
}

impl RuleDescriptor {
    /// Create a descriptor for the given rule kind.
    pub fn new(kind: impl Into<RuleKind>) -> Self {
        Self {
            kind: kind.into(),
            order: 0,
            message: None,
            params: BTreeMap::new(),
        }
    }

    /// Set the failure sort order.
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Set a message override for this rule.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set a kind-specific parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a parameter as an integer.
    pub fn int_param(&self, key: &str) -> Option<i64> {
        match self.params.get(key) {
            Some(ParamValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Get a parameter as a float, widening integers.
    pub fn float_param(&self, key: &str) -> Option<f64> {
        match self.params.get(key) {
            Some(ParamValue::Float(n)) => Some(*n),
            Some(ParamValue::Int(i)) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get a parameter as a string slice.
    pub fn text_param(&self, key: &str) -> Option<&str> {
        match self.params.get(key) {
            Some(ParamValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Get a parameter as a boolean.
    pub fn flag_param(&self, key: &str) -> Option<bool> {
        match self.params.get(key) {
            Some(ParamValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    /// Iterate over all parameters.
    pub fn params(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }
}
