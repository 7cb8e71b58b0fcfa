//! Conditional rule gating.
//!
//! A field may declare a condition: a predicate over *another* widget's
//! current value that decides whether the field's rules run at all. The
//! classic case is "validate the VAT number only while the business checkbox
//! is ticked". Conditions are re-evaluated on every validation pass.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::descriptor::RuleKind;
use crate::value::FieldValue;
use crate::widget::WidgetId;

/// Name of a condition evaluator kind, e.g. `"is_checked"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConditionKind(Cow<'static, str>);

impl ConditionKind {
    /// Create a condition kind from a static string.
    pub const fn from_static(kind: &'static str) -> Self {
        Self(Cow::Borrowed(kind))
    }

    /// Create a condition kind from an owned or borrowed string.
    pub fn new(kind: impl Into<String>) -> Self {
        Self(Cow::Owned(kind.into()))
    }

    /// Get the kind as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConditionKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ConditionKind {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which of a field's rules a condition gates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConditionGate {
    /// The condition gates every rule on the field.
    #[default]
    AllRules,
    /// The condition gates only rules of the given kind.
    Rule(RuleKind),
}

/// A condition attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDescriptor {
    /// The widget whose value the condition inspects.
    pub widget: WidgetId,
    /// The evaluator kind deciding the outcome.
    pub evaluator: ConditionKind,
    /// Which rules the condition gates. Defaults to all of them.
    #[serde(default)]
    pub gate: ConditionGate,
}

impl ConditionDescriptor {
    /// Create a condition gating all rules of the field.
    pub fn new(widget: impl Into<WidgetId>, evaluator: impl Into<ConditionKind>) -> Self {
        Self {
            widget: widget.into(),
            evaluator: evaluator.into(),
            gate: ConditionGate::AllRules,
        }
    }

    /// Restrict the condition to rules of a single kind.
    pub fn gate(mut self, kind: impl Into<RuleKind>) -> Self {
        self.gate = ConditionGate::Rule(kind.into());
        self
    }
}

/// A predicate over a widget value.
///
/// Evaluators are registered by kind and instantiated fresh for each
/// evaluation, so implementations should be cheap zero-state structs.
pub trait ConditionEvaluator: Send + Sync {
    /// Decide whether the gated rules should run.
    fn evaluate(&self, value: &FieldValue) -> bool;
}

/// Condition evaluator registration entry for inventory.
pub struct ConditionRegistration {
    /// Evaluator kind.
    pub kind: ConditionKind,
    /// Factory function to create the evaluator.
    pub factory: fn() -> Box<dyn ConditionEvaluator>,
}

impl ConditionRegistration {
    /// Create a new condition evaluator registration.
    pub const fn new(kind: ConditionKind, factory: fn() -> Box<dyn ConditionEvaluator>) -> Self {
        Self { kind, factory }
    }
}

inventory::collect!(ConditionRegistration);

/// Get all condition evaluators registered via inventory.
pub fn registered_conditions() -> impl Iterator<Item = &'static ConditionRegistration> {
    inventory::iter::<ConditionRegistration>()
}

/// Kind of the built-in checked-state condition.
pub const IS_CHECKED: ConditionKind = ConditionKind::from_static("is_checked");
/// Kind of the built-in unchecked-state condition.
pub const IS_UNCHECKED: ConditionKind = ConditionKind::from_static("is_unchecked");
/// Kind of the built-in has-text condition.
pub const HAS_TEXT: ConditionKind = ConditionKind::from_static("has_text");

/// Condition that runs rules only while a checkbox is checked.
pub fn when_checked(widget: impl Into<WidgetId>) -> ConditionDescriptor {
    ConditionDescriptor::new(widget, IS_CHECKED)
}

/// Condition that runs rules only while a checkbox is unchecked.
pub fn when_unchecked(widget: impl Into<WidgetId>) -> ConditionDescriptor {
    ConditionDescriptor::new(widget, IS_UNCHECKED)
}

/// Condition that runs rules only while a text widget is non-blank.
pub fn when_has_text(widget: impl Into<WidgetId>) -> ConditionDescriptor {
    ConditionDescriptor::new(widget, HAS_TEXT)
}

/// Passes while the inspected widget reports a `true` flag.
struct IsChecked;

impl ConditionEvaluator for IsChecked {
    fn evaluate(&self, value: &FieldValue) -> bool {
        match value.as_flag() {
            Some(b) => b,
            None => {
                log::warn!("is_checked condition expected a flag value, got {value:?}");
                false
            }
        }
    }
}

/// Passes while the inspected widget reports a `false` flag.
struct IsUnchecked;

impl ConditionEvaluator for IsUnchecked {
    fn evaluate(&self, value: &FieldValue) -> bool {
        match value.as_flag() {
            Some(b) => !b,
            None => {
                log::warn!("is_unchecked condition expected a flag value, got {value:?}");
                false
            }
        }
    }
}

/// Passes while the inspected widget holds non-blank text.
struct HasText;

impl ConditionEvaluator for HasText {
    fn evaluate(&self, value: &FieldValue) -> bool {
        match value {
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Empty => false,
            other => {
                log::warn!("has_text condition expected a text value, got {other:?}");
                false
            }
        }
    }
}

inventory::submit! {
    ConditionRegistration::new(IS_CHECKED, || Box::new(IsChecked) as Box<dyn ConditionEvaluator>)
}

inventory::submit! {
    ConditionRegistration::new(IS_UNCHECKED, || Box::new(IsUnchecked) as Box<dyn ConditionEvaluator>)
}

inventory::submit! {
    ConditionRegistration::new(HAS_TEXT, || Box::new(HasText) as Box<dyn ConditionEvaluator>)
}
