//! Numeric range rules.

use log::warn;

use crate::descriptor::{RuleDescriptor, RuleKind};
use crate::message::{resolve_message, MessageContext};
use crate::validator::{Validator, ValidatorRegistration};
use crate::value::FieldValue;

/// Kind of the minimum-value rule.
pub const MIN_VALUE: RuleKind = RuleKind::from_static("min_value");
/// Kind of the maximum-value rule.
pub const MAX_VALUE: RuleKind = RuleKind::from_static("max_value");

/// Rule: the value must be at least `min`.
pub fn min_value(min: f64) -> RuleDescriptor {
    RuleDescriptor::new(MIN_VALUE).param("min", min)
}

/// Rule: the value must be at most `max`.
pub fn max_value(max: f64) -> RuleDescriptor {
    RuleDescriptor::new(MAX_VALUE).param("max", max)
}

/// How a value reads as a number.
///
/// Numbers are used as-is and text is parsed. Unparseable text fails range
/// rules; everything else is outside their domain and passes.
enum Reading {
    Numeric(f64),
    Unparseable,
    OutOfDomain,
    Absent,
}

fn read_number(kind: &str, value: &FieldValue) -> Reading {
    match value {
        FieldValue::Number(n) => Reading::Numeric(*n),
        FieldValue::Text(s) if s.trim().is_empty() => Reading::Absent,
        FieldValue::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) => Reading::Numeric(n),
            Err(_) => Reading::Unparseable,
        },
        FieldValue::Empty => Reading::Absent,
        other => {
            warn!("{kind} rule applied to non-numeric value {other:?}");
            Reading::OutOfDomain
        }
    }
}

struct MinValue;

impl Validator for MinValue {
    fn kind(&self) -> RuleKind {
        MIN_VALUE
    }

    fn check(&self, rule: &RuleDescriptor) -> Result<(), String> {
        match rule.float_param("min") {
            Some(_) => Ok(()),
            None => Err("missing 'min' parameter".into()),
        }
    }

    fn validate(&self, rule: &RuleDescriptor, value: &FieldValue) -> bool {
        let Some(min) = rule.float_param("min") else {
            return true;
        };
        match read_number("min_value", value) {
            Reading::Numeric(n) => n >= min,
            Reading::Unparseable => false,
            Reading::OutOfDomain | Reading::Absent => true,
        }
    }

    fn message(&self, cx: &MessageContext, rule: &RuleDescriptor, value: &FieldValue) -> String {
        resolve_message(cx, rule, value, "must be at least {min}")
    }
}

struct MaxValue;

impl Validator for MaxValue {
    fn kind(&self) -> RuleKind {
        MAX_VALUE
    }

    fn check(&self, rule: &RuleDescriptor) -> Result<(), String> {
        match rule.float_param("max") {
            Some(_) => Ok(()),
            None => Err("missing 'max' parameter".into()),
        }
    }

    fn validate(&self, rule: &RuleDescriptor, value: &FieldValue) -> bool {
        let Some(max) = rule.float_param("max") else {
            return true;
        };
        match read_number("max_value", value) {
            Reading::Numeric(n) => n <= max,
            Reading::Unparseable => false,
            Reading::OutOfDomain | Reading::Absent => true,
        }
    }

    fn message(&self, cx: &MessageContext, rule: &RuleDescriptor, value: &FieldValue) -> String {
        resolve_message(cx, rule, value, "must be at most {max}")
    }
}

inventory::submit! {
    ValidatorRegistration::new(MIN_VALUE, || Box::new(MinValue) as Box<dyn Validator>)
}

inventory::submit! {
    ValidatorRegistration::new(MAX_VALUE, || Box::new(MaxValue) as Box<dyn Validator>)
}
