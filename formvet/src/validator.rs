//! The validator contract and inventory registration.

use crate::descriptor::{RuleDescriptor, RuleKind};
use crate::message::MessageContext;
use crate::value::FieldValue;

/// A rule-kind implementation.
///
/// One instance is created lazily per registered kind and then shared across
/// every target and thread, so implementations must be `Send + Sync` and keep
/// any mutable state (such as a compiled-pattern cache) behind interior
/// mutability. All per-rule configuration arrives through the
/// [`RuleDescriptor`].
pub trait Validator: Send + Sync {
    /// The rule kind this validator implements.
    fn kind(&self) -> RuleKind;

    /// Vet a descriptor's parameters before it is bound to a field.
    ///
    /// Runs once when a target's rules are indexed. Returning an error makes
    /// the whole index build fail with
    /// [`EngineError::InvalidRule`](crate::error::EngineError::InvalidRule),
    /// surfacing broken declarations at bind time instead of mid-validation.
    /// Runs while the engine holds its validator registry, so it must not
    /// call back into the engine.
    fn check(&self, rule: &RuleDescriptor) -> Result<(), String> {
        let _ = rule;
        Ok(())
    }

    /// Decide whether the value satisfies the rule.
    fn validate(&self, rule: &RuleDescriptor, value: &FieldValue) -> bool;

    /// Produce the failure message for a value that did not satisfy the rule.
    fn message(&self, cx: &MessageContext, rule: &RuleDescriptor, value: &FieldValue) -> String;

    /// Derive the rule's sort order. Defaults to the descriptor's own order.
    fn order(&self, rule: &RuleDescriptor) -> i32 {
        rule.order
    }
}

/// Validator registration entry for inventory.
///
/// Built-in validators self-register at link time; applications add their own
/// either the same way or at runtime via
/// [`ValidationEngine::register_validator`](crate::engine::ValidationEngine::register_validator).
pub struct ValidatorRegistration {
    /// Rule kind the validator handles.
    pub kind: RuleKind,
    /// Factory function to create the validator.
    pub factory: fn() -> Box<dyn Validator>,
}

impl ValidatorRegistration {
    /// Create a new validator registration.
    pub const fn new(kind: RuleKind, factory: fn() -> Box<dyn Validator>) -> Self {
        Self { kind, factory }
    }
}

inventory::collect!(ValidatorRegistration);

/// Get all validators registered via inventory.
pub fn registered_validators() -> impl Iterator<Item = &'static ValidatorRegistration> {
    inventory::iter::<ValidatorRegistration>()
}
