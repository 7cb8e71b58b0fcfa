//! Runtime registries for validators and condition evaluators.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::condition::{registered_conditions, ConditionEvaluator, ConditionKind};
use crate::descriptor::RuleKind;
use crate::validator::{registered_validators, Validator};

struct ValidatorSlot {
    factory: fn() -> Box<dyn Validator>,
    /// Lazily created shared instance. One per kind for the life of the
    /// registry; dropped when the slot's factory is replaced.
    instance: Option<Arc<dyn Validator>>,
}

/// Maps rule kinds to validator instances.
///
/// Registration stores only the factory. The instance is created on first
/// resolve and cached, so unused validators cost nothing.
pub(crate) struct ValidatorRegistry {
    slots: HashMap<RuleKind, ValidatorSlot>,
}

impl ValidatorRegistry {
    /// Create a registry pre-populated from inventory.
    pub(crate) fn seeded() -> Self {
        let mut registry = Self {
            slots: HashMap::new(),
        };
        for registration in registered_validators() {
            registry.register(registration.kind.clone(), registration.factory);
        }
        registry
    }

    /// Register a validator factory, replacing any previous one of the kind.
    pub(crate) fn register(&mut self, kind: RuleKind, factory: fn() -> Box<dyn Validator>) {
        if self
            .slots
            .insert(
                kind.clone(),
                ValidatorSlot {
                    factory,
                    instance: None,
                },
            )
            .is_some()
        {
            debug!("validator for kind '{kind}' replaced");
        }
    }

    /// Resolve a kind to its shared validator instance, creating it on first
    /// use. Returns `None` for unregistered kinds.
    pub(crate) fn resolve(&mut self, kind: &RuleKind) -> Option<Arc<dyn Validator>> {
        let slot = self.slots.get_mut(kind)?;
        if slot.instance.is_none() {
            slot.instance = Some(Arc::from((slot.factory)()));
        }
        slot.instance.clone()
    }

    /// Number of registered kinds.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Maps condition kinds to evaluator factories.
///
/// Evaluators are stateless predicates, so unlike validators they are built
/// fresh per evaluation rather than cached. The table holds plain fn
/// pointers, so cloning is cheap; validation passes run against such a
/// snapshot instead of holding the registry lock.
#[derive(Clone)]
pub(crate) struct ConditionRegistry {
    factories: HashMap<ConditionKind, fn() -> Box<dyn ConditionEvaluator>>,
}

impl ConditionRegistry {
    /// Create a registry pre-populated from inventory.
    pub(crate) fn seeded() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        for registration in registered_conditions() {
            registry.register(registration.kind.clone(), registration.factory);
        }
        registry
    }

    /// Register an evaluator factory, replacing any previous one of the kind.
    pub(crate) fn register(
        &mut self,
        kind: ConditionKind,
        factory: fn() -> Box<dyn ConditionEvaluator>,
    ) {
        if self.factories.insert(kind.clone(), factory).is_some() {
            debug!("condition evaluator for kind '{kind}' replaced");
        }
    }

    /// Instantiate the evaluator for a kind, or `None` if unregistered.
    pub(crate) fn instantiate(&self, kind: &ConditionKind) -> Option<Box<dyn ConditionEvaluator>> {
        self.factories.get(kind).map(|factory| factory())
    }

    /// Number of registered kinds.
    pub(crate) fn len(&self) -> usize {
        self.factories.len()
    }
}
