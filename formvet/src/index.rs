//! The bound-rule index built per target.
//!
//! Discovery walks a target's declared fields once, resolves widget bindings
//! and validator kinds, vets rule parameters, and produces an immutable
//! index that validation passes reuse until
//! [`clear_caches`](crate::engine::ValidationEngine::clear_caches) drops it.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};

use crate::condition::ConditionDescriptor;
use crate::descriptor::RuleDescriptor;
use crate::error::{EngineError, EngineResult};
use crate::registry::ValidatorRegistry;
use crate::target::{TargetId, TargetSpec};
use crate::validator::Validator;
use crate::widget::WidgetId;

/// A rule descriptor bound to its resolved validator instance.
pub(crate) struct BoundRule {
    pub(crate) rule: RuleDescriptor,
    pub(crate) validator: Arc<dyn Validator>,
    /// Order derived through [`Validator::order`] at bind time.
    pub(crate) order: i32,
}

/// One indexed field: a resolved widget with its bound rules.
pub(crate) struct FieldRecord {
    pub(crate) name: String,
    pub(crate) widget: WidgetId,
    pub(crate) condition: Option<ConditionDescriptor>,
    /// Bound rules sorted ascending by order, ties in declaration order.
    pub(crate) rules: Vec<BoundRule>,
}

/// Immutable per-target index of bound rules.
pub(crate) struct TargetFieldIndex {
    /// Indexed fields in declaration order.
    pub(crate) fields: Vec<FieldRecord>,
    /// Every widget the target declares, including condition sources and
    /// fields that ended up with no bound rules. Conditions may only inspect
    /// widgets in this set.
    pub(crate) widgets: HashSet<WidgetId>,
}

impl std::fmt::Debug for TargetFieldIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetFieldIndex")
            .field(
                "fields",
                &self
                    .fields
                    .iter()
                    .map(|record| record.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("widgets", &self.widgets)
            .finish()
    }
}

impl TargetFieldIndex {
    /// Find the indexed field for a widget, if any.
    pub(crate) fn record_for(&self, widget: &WidgetId) -> Option<&FieldRecord> {
        self.fields.iter().find(|record| &record.widget == widget)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Build the bound-rule index for a target.
///
/// Unregistered rule kinds are dropped quietly so rule sets can carry kinds
/// that only some builds register. A descriptor whose parameters fail the
/// validator's [`check`](Validator::check) aborts the build instead.
pub(crate) fn build_index(
    target: TargetId,
    spec: &TargetSpec,
    validators: &mut ValidatorRegistry,
) -> EngineResult<TargetFieldIndex> {
    let mut fields = Vec::new();
    let mut widgets = HashSet::new();

    for field in &spec.fields {
        let Some(widget) = (field.widget)() else {
            warn!(
                "{target}: field '{}' has no widget bound, skipping",
                field.name
            );
            continue;
        };
        widgets.insert(widget.clone());

        let mut rules = Vec::new();
        for rule in &field.rules {
            let Some(validator) = validators.resolve(&rule.kind) else {
                debug!(
                    "{target}: no validator for kind '{}' on field '{}', rule dropped",
                    rule.kind, field.name
                );
                continue;
            };
            if let Err(reason) = validator.check(rule) {
                return Err(EngineError::InvalidRule {
                    kind: rule.kind.clone(),
                    widget,
                    reason,
                });
            }
            let order = validator.order(rule);
            rules.push(BoundRule {
                rule: rule.clone(),
                validator,
                order,
            });
        }

        if rules.is_empty() {
            debug!(
                "{target}: field '{}' has no applicable rules, not indexed",
                field.name
            );
            continue;
        }

        rules.sort_by_key(|bound| bound.order);
        fields.push(FieldRecord {
            name: field.name.clone(),
            widget,
            condition: field.condition.clone(),
            rules,
        });
    }

    for widget in &spec.condition_sources {
        widgets.insert(widget.clone());
    }

    debug!(
        "{target}: indexed {} of {} declared fields for '{}'",
        fields.len(),
        spec.fields.len(),
        spec.name
    );

    Ok(TargetFieldIndex { fields, widgets })
}
