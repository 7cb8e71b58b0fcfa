//! Text rules.

use std::collections::HashMap;
use std::sync::Mutex;

use log::warn;
use regex::Regex;

use crate::descriptor::{RuleDescriptor, RuleKind};
use crate::message::{resolve_message, MessageContext};
use crate::validator::{Validator, ValidatorRegistration};
use crate::value::FieldValue;

/// Kind of the non-empty rule.
pub const NOT_EMPTY: RuleKind = RuleKind::from_static("not_empty");
/// Kind of the minimum-length rule.
pub const MIN_LENGTH: RuleKind = RuleKind::from_static("min_length");
/// Kind of the maximum-length rule.
pub const MAX_LENGTH: RuleKind = RuleKind::from_static("max_length");
/// Kind of the regex-pattern rule.
pub const PATTERN: RuleKind = RuleKind::from_static("pattern");
/// Kind of the email rule.
pub const EMAIL: RuleKind = RuleKind::from_static("email");

/// Rule: the value must be present, and text must be non-blank.
pub fn not_empty() -> RuleDescriptor {
    RuleDescriptor::new(NOT_EMPTY)
}

/// Rule: text must be at least `min` characters long.
pub fn min_length(min: usize) -> RuleDescriptor {
    RuleDescriptor::new(MIN_LENGTH).param("min", min)
}

/// Rule: text must be at most `max` characters long.
pub fn max_length(max: usize) -> RuleDescriptor {
    RuleDescriptor::new(MAX_LENGTH).param("max", max)
}

/// Rule: text must match the given regex.
pub fn pattern(pattern: impl Into<String>) -> RuleDescriptor {
    RuleDescriptor::new(PATTERN).param("pattern", pattern.into())
}

/// Rule: text must be a well-formed email address.
pub fn email() -> RuleDescriptor {
    RuleDescriptor::new(EMAIL)
}

struct NotEmpty;

impl Validator for NotEmpty {
    fn kind(&self) -> RuleKind {
        NOT_EMPTY
    }

    fn validate(&self, _rule: &RuleDescriptor, value: &FieldValue) -> bool {
        match value {
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Empty => false,
            FieldValue::Selection(selection) => selection.is_some(),
            FieldValue::Number(_) => true,
            FieldValue::Flag(_) => {
                warn!("not_empty rule applied to a flag value");
                true
            }
        }
    }

    fn message(&self, cx: &MessageContext, rule: &RuleDescriptor, value: &FieldValue) -> String {
        resolve_message(cx, rule, value, "must not be empty")
    }
}

struct MinLength;

impl Validator for MinLength {
    fn kind(&self) -> RuleKind {
        MIN_LENGTH
    }

    fn check(&self, rule: &RuleDescriptor) -> Result<(), String> {
        match rule.int_param("min") {
            Some(min) if min >= 0 => Ok(()),
            Some(_) => Err("'min' must be non-negative".into()),
            None => Err("missing 'min' parameter".into()),
        }
    }

    fn validate(&self, rule: &RuleDescriptor, value: &FieldValue) -> bool {
        let Some(min) = rule.int_param("min") else {
            return true;
        };
        match value {
            FieldValue::Text(s) => s.chars().count() as i64 >= min,
            FieldValue::Empty => true,
            other => {
                warn!("min_length rule applied to non-text value {other:?}");
                true
            }
        }
    }

    fn message(&self, cx: &MessageContext, rule: &RuleDescriptor, value: &FieldValue) -> String {
        resolve_message(cx, rule, value, "must be at least {min} characters")
    }
}

struct MaxLength;

impl Validator for MaxLength {
    fn kind(&self) -> RuleKind {
        MAX_LENGTH
    }

    fn check(&self, rule: &RuleDescriptor) -> Result<(), String> {
        match rule.int_param("max") {
            Some(max) if max >= 0 => Ok(()),
            Some(_) => Err("'max' must be non-negative".into()),
            None => Err("missing 'max' parameter".into()),
        }
    }

    fn validate(&self, rule: &RuleDescriptor, value: &FieldValue) -> bool {
        let Some(max) = rule.int_param("max") else {
            return true;
        };
        match value {
            FieldValue::Text(s) => s.chars().count() as i64 <= max,
            FieldValue::Empty => true,
            other => {
                warn!("max_length rule applied to non-text value {other:?}");
                true
            }
        }
    }

    fn message(&self, cx: &MessageContext, rule: &RuleDescriptor, value: &FieldValue) -> String {
        resolve_message(cx, rule, value, "must be at most {max} characters")
    }
}

/// Regex rule with a compiled-pattern cache shared across fields.
struct Pattern {
    cache: Mutex<HashMap<String, Regex>>,
}

impl Pattern {
    fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn matches(&self, pattern: &str, text: &str) -> bool {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(re) = cache.get(pattern) {
            return re.is_match(text);
        }
        match Regex::new(pattern) {
            Ok(re) => {
                let hit = re.is_match(text);
                cache.insert(pattern.to_string(), re);
                hit
            }
            Err(error) => {
                warn!("invalid pattern '{pattern}': {error}");
                true
            }
        }
    }
}

impl Validator for Pattern {
    fn kind(&self) -> RuleKind {
        PATTERN
    }

    fn check(&self, rule: &RuleDescriptor) -> Result<(), String> {
        let Some(pattern) = rule.text_param("pattern") else {
            return Err("missing 'pattern' parameter".into());
        };
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if cache.contains_key(pattern) {
            return Ok(());
        }
        match Regex::new(pattern) {
            Ok(re) => {
                cache.insert(pattern.to_string(), re);
                Ok(())
            }
            Err(error) => Err(format!("invalid pattern: {error}")),
        }
    }

    fn validate(&self, rule: &RuleDescriptor, value: &FieldValue) -> bool {
        let Some(pattern) = rule.text_param("pattern") else {
            return true;
        };
        match value {
            FieldValue::Text(s) => self.matches(pattern, s),
            FieldValue::Empty => true,
            other => {
                warn!("pattern rule applied to non-text value {other:?}");
                true
            }
        }
    }

    fn message(&self, cx: &MessageContext, rule: &RuleDescriptor, value: &FieldValue) -> String {
        resolve_message(cx, rule, value, "does not match the expected format")
    }
}

struct Email;

impl Validator for Email {
    fn kind(&self) -> RuleKind {
        EMAIL
    }

    fn validate(&self, _rule: &RuleDescriptor, value: &FieldValue) -> bool {
        match value {
            // Empty is valid; compose with not_empty for presence.
            FieldValue::Text(s) if s.is_empty() => true,
            FieldValue::Text(s) => email_address::EmailAddress::is_valid(s),
            FieldValue::Empty => true,
            other => {
                warn!("email rule applied to non-text value {other:?}");
                true
            }
        }
    }

    fn message(&self, cx: &MessageContext, rule: &RuleDescriptor, value: &FieldValue) -> String {
        resolve_message(cx, rule, value, "must be a valid email address")
    }
}

inventory::submit! {
    ValidatorRegistration::new(NOT_EMPTY, || Box::new(NotEmpty) as Box<dyn Validator>)
}

inventory::submit! {
    ValidatorRegistration::new(MIN_LENGTH, || Box::new(MinLength) as Box<dyn Validator>)
}

inventory::submit! {
    ValidatorRegistration::new(MAX_LENGTH, || Box::new(MaxLength) as Box<dyn Validator>)
}

inventory::submit! {
    ValidatorRegistration::new(PATTERN, || Box::new(Pattern::new()) as Box<dyn Validator>)
}

inventory::submit! {
    ValidatorRegistration::new(EMAIL, || Box::new(Email) as Box<dyn Validator>)
}
