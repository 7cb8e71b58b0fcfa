//! Values read from widgets at validation time.

use serde::{Deserialize, Serialize};

/// A snapshot of a widget's current value.
///
/// Field adapters produce these; validators and condition evaluators consume
/// them. Rules that receive a value kind outside their domain pass (see the
/// [`validators`](crate::validators) module docs), so a mismatched adapter
/// never turns into a spurious failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Free text, e.g. from a text input.
    Text(String),
    /// A boolean state, e.g. from a checkbox or toggle.
    Flag(bool),
    /// A numeric value, e.g. from a spinner or slider.
    Number(f64),
    /// A selection index, `None` when nothing is selected.
    Selection(Option<usize>),
    /// The widget currently has no value at all.
    Empty,
}

impl FieldValue {
    /// Get the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the boolean state, if this is a flag value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the selection index, if this is a selection value.
    pub fn as_selection(&self) -> Option<Option<usize>> {
        match self {
            Self::Selection(s) => Some(*s),
            _ => None,
        }
    }

    /// Check if the widget had no value at all.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Selection(Some(index)) => write!(f, "{index}"),
            Self::Selection(None) => f.write_str("none"),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<Option<usize>> for FieldValue {
    fn from(s: Option<usize>) -> Self {
        Self::Selection(s)
    }
}
