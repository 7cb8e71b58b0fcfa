//! Bridging widgets to values.
//!
//! The engine is toolkit-agnostic. The embedding application supplies an
//! [`AdapterResolver`] when constructing the engine; the resolver hands out
//! [`FieldAdapter`]s that read a widget's current value whenever a rule or
//! condition needs one. Nothing is cached on this path, so adapters always
//! see live state.

use std::sync::Arc;

use thiserror::Error;

use crate::descriptor::{RuleDescriptor, RuleKind};
use crate::target::TargetId;
use crate::value::FieldValue;
use crate::widget::WidgetId;

/// Error raised by a field adapter while reading a widget value.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct AdapterError(String);

impl AdapterError {
    /// Create a new adapter error.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Reads a widget's current value.
pub trait FieldAdapter: Send + Sync {
    /// Read the widget's value.
    ///
    /// `rule` is the descriptor driving the read, or `None` when the value is
    /// read for a condition. Adapters may use it to pick a representation,
    /// e.g. return [`FieldValue::Number`] for numeric rules.
    fn value(
        &self,
        rule: Option<&RuleDescriptor>,
        target: TargetId,
        widget: &WidgetId,
    ) -> Result<FieldValue, AdapterError>;
}

/// Resolves widgets to field adapters.
pub trait AdapterResolver: Send + Sync {
    /// Get an adapter for the given widget, or `None` when the widget has no
    /// readable value representation for the given rule kind.
    fn adapter_for(
        &self,
        widget: &WidgetId,
        kind: Option<&RuleKind>,
    ) -> Option<Arc<dyn FieldAdapter>>;
}
