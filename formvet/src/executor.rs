//! The validation pass.
//!
//! Pure functions over a built [`TargetFieldIndex`]: no caching and no
//! engine state beyond what the caller borrows in via [`ExecEnv`]. Values
//! are read from adapters at the moment a rule runs, so a pass always sees
//! live widget state.

use log::trace;

use crate::adapter::AdapterResolver;
use crate::condition::{ConditionDescriptor, ConditionGate};
use crate::descriptor::RuleDescriptor;
use crate::error::{EngineError, EngineResult};
use crate::index::{FieldRecord, TargetFieldIndex};
use crate::message::MessageContext;
use crate::registry::ConditionRegistry;
use crate::result::{ValidationFailure, ValidationReport};
use crate::target::TargetId;
use crate::value::FieldValue;
use crate::widget::WidgetId;

/// Borrowed collaborators for one validation pass.
pub(crate) struct ExecEnv<'a> {
    pub(crate) target: TargetId,
    pub(crate) resolver: &'a dyn AdapterResolver,
    pub(crate) conditions: &'a ConditionRegistry,
    pub(crate) cx: &'a MessageContext,
}

/// Validate every indexed field of a target.
///
/// Failures are collected across fields and sorted ascending by rule order;
/// ties keep field declaration order. An empty index passes.
pub(crate) fn validate_target(
    env: &ExecEnv,
    index: &TargetFieldIndex,
) -> EngineResult<ValidationReport> {
    let mut failures = Vec::new();
    for record in &index.fields {
        if let Some(failure) = validate_field(env, index, record)? {
            failures.push(failure);
        }
    }
    if failures.is_empty() {
        Ok(ValidationReport::Passed)
    } else {
        failures.sort_by_key(|failure| failure.order);
        Ok(ValidationReport::Failed(failures))
    }
}

/// Validate a single indexed field.
///
/// Rules run in their sorted order and the first failing rule produces the
/// field's failure; later rules are not evaluated. Returns `None` when the
/// field passes or its condition gates all rules off.
pub(crate) fn validate_field(
    env: &ExecEnv,
    index: &TargetFieldIndex,
    record: &FieldRecord,
) -> EngineResult<Option<ValidationFailure>> {
    if let Some(condition) = &record.condition
        && condition.gate == ConditionGate::AllRules
        && !evaluate_condition(env, index, condition)?
    {
        trace!(
            "{}: condition '{}' off, skipping field '{}'",
            env.target, condition.evaluator, record.name
        );
        return Ok(None);
    }

    for bound in &record.rules {
        if let Some(condition) = &record.condition
            && let ConditionGate::Rule(kind) = &condition.gate
            && *kind == bound.rule.kind
            && !evaluate_condition(env, index, condition)?
        {
            trace!(
                "{}: condition '{}' off, skipping rule '{}' on field '{}'",
                env.target, condition.evaluator, kind, record.name
            );
            continue;
        }

        let value = read_value(env, Some(&bound.rule), &record.widget)?;
        if !bound.validator.validate(&bound.rule, &value) {
            let message = bound.validator.message(env.cx, &bound.rule, &value);
            trace!(
                "{}: rule '{}' failed on field '{}'",
                env.target, bound.rule.kind, record.name
            );
            return Ok(Some(ValidationFailure {
                widget: record.widget.clone(),
                field: record.name.clone(),
                message,
                order: bound.order,
            }));
        }
    }
    Ok(None)
}

/// Evaluate a condition against the live value of its widget.
///
/// The condition may only inspect widgets the target declares, either as
/// fields or via
/// [`condition_source`](crate::target::TargetSpec::condition_source).
fn evaluate_condition(
    env: &ExecEnv,
    index: &TargetFieldIndex,
    condition: &ConditionDescriptor,
) -> EngineResult<bool> {
    if !index.widgets.contains(&condition.widget) {
        return Err(EngineError::ConditionWidgetUnknown {
            widget: condition.widget.clone(),
        });
    }
    let evaluator = env
        .conditions
        .instantiate(&condition.evaluator)
        .ok_or_else(|| EngineError::EvaluatorMissing {
            kind: condition.evaluator.clone(),
        })?;
    let value = read_value(env, None, &condition.widget)?;
    Ok(evaluator.evaluate(&value))
}

fn read_value(
    env: &ExecEnv,
    rule: Option<&RuleDescriptor>,
    widget: &WidgetId,
) -> EngineResult<FieldValue> {
    let kind = rule.map(|rule| &rule.kind);
    let adapter =
        env.resolver
            .adapter_for(widget, kind)
            .ok_or_else(|| EngineError::AdapterMissing {
                widget: widget.clone(),
                kind: kind.cloned(),
            })?;
    adapter
        .value(rule, env.target, widget)
        .map_err(|source| EngineError::ValueUnavailable {
            widget: widget.clone(),
            source,
        })
}
