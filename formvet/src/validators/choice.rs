//! Checkbox and selection rules.

use log::warn;

use crate::descriptor::{RuleDescriptor, RuleKind};
use crate::message::{resolve_message, MessageContext};
use crate::validator::{Validator, ValidatorRegistration};
use crate::value::FieldValue;

/// Kind of the must-be-checked rule.
pub const CHECKED: RuleKind = RuleKind::from_static("checked");
/// Kind of the must-have-selection rule.
pub const SELECTED: RuleKind = RuleKind::from_static("selected");

/// Rule: the checkbox must be checked.
pub fn checked() -> RuleDescriptor {
    RuleDescriptor::new(CHECKED)
}

/// Rule: an option must be selected.
pub fn selected() -> RuleDescriptor {
    RuleDescriptor::new(SELECTED)
}

struct Checked;

impl Validator for Checked {
    fn kind(&self) -> RuleKind {
        CHECKED
    }

    fn validate(&self, _rule: &RuleDescriptor, value: &FieldValue) -> bool {
        match value {
            FieldValue::Flag(b) => *b,
            FieldValue::Empty => false,
            other => {
                warn!("checked rule applied to non-flag value {other:?}");
                true
            }
        }
    }

    fn message(&self, cx: &MessageContext, rule: &RuleDescriptor, value: &FieldValue) -> String {
        resolve_message(cx, rule, value, "must be checked")
    }
}

struct Selected;

impl Validator for Selected {
    fn kind(&self) -> RuleKind {
        SELECTED
    }

    fn validate(&self, _rule: &RuleDescriptor, value: &FieldValue) -> bool {
        match value {
            FieldValue::Selection(selection) => selection.is_some(),
            FieldValue::Empty => false,
            other => {
                warn!("selected rule applied to non-selection value {other:?}");
                true
            }
        }
    }

    fn message(&self, cx: &MessageContext, rule: &RuleDescriptor, value: &FieldValue) -> String {
        resolve_message(cx, rule, value, "an option must be selected")
    }
}

inventory::submit! {
    ValidatorRegistration::new(CHECKED, || Box::new(Checked) as Box<dyn Validator>)
}

inventory::submit! {
    ValidatorRegistration::new(SELECTED, || Box::new(Selected) as Box<dyn Validator>)
}
