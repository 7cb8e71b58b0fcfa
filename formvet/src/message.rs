//! Failure message resolution.

use std::collections::HashMap;

use crate::descriptor::{RuleDescriptor, RuleKind};
use crate::value::FieldValue;

/// Per-validation message catalog.
///
/// Carries application-supplied templates keyed by rule kind, letting one
/// rule set produce different wording per screen or locale. Templates may
/// reference rule parameters by name (`{min}`, `{pattern}`) and the failing
/// value as `{value}`.
///
/// Resolution order for a failure message:
/// 1. the descriptor's `message` override,
/// 2. the context template for the rule's kind,
/// 3. the validator's built-in default.
#[derive(Debug, Clone, Default)]
pub struct MessageContext {
    templates: HashMap<RuleKind, String>,
}

impl MessageContext {
    /// Create an empty message context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template for a rule kind.
    pub fn template(mut self, kind: impl Into<RuleKind>, template: impl Into<String>) -> Self {
        self.templates.insert(kind.into(), template.into());
        self
    }

    /// Look up the template for a rule kind.
    pub fn template_for(&self, kind: &RuleKind) -> Option<&str> {
        self.templates.get(kind).map(String::as_str)
    }
}

/// Render a template against a rule's parameters and the failing value.
pub fn render(template: &str, rule: &RuleDescriptor, value: &FieldValue) -> String {
    let mut message = template.to_string();
    for (key, param) in rule.params() {
        message = message.replace(&format!("{{{key}}}"), &param.to_string());
    }
    message.replace("{value}", &value.to_string())
}

/// Resolve the failure message for a rule using the standard precedence.
pub fn resolve_message(
    cx: &MessageContext,
    rule: &RuleDescriptor,
    value: &FieldValue,
    default_template: &str,
) -> String {
    let template = rule
        .message
        .as_deref()
        .or_else(|| cx.template_for(&rule.kind))
        .unwrap_or(default_template);
    render(template, rule, value)
}
