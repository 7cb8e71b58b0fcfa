//! Widget identity.

use serde::{Deserialize, Serialize};

/// Unique identifier for a widget inside a validation target.
///
/// The engine never talks to a toolkit directly; widgets are referred to by
/// id and an [`AdapterResolver`](crate::adapter::AdapterResolver) turns ids
/// into values on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId(String);

impl WidgetId {
    /// Create a new widget ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WidgetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WidgetId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
