//! Validation targets and their registry.
//!
//! A target is a screen-sized unit of validation: a named set of fields,
//! each binding a widget to rule descriptors. Registering a target hands
//! back an opaque [`TargetId`]; the engine owns the description in an
//! internal arena until
//! [`release_target`](crate::engine::ValidationEngine::release_target)
//! drops it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::condition::ConditionDescriptor;
use crate::descriptor::RuleDescriptor;
use crate::index::TargetFieldIndex;
use crate::widget::WidgetId;

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to a registered validation target.
///
/// Handles are never reused within a process, so a released handle stays
/// invalid instead of silently pointing at a newer target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    /// Allocate the next process-unique target ID.
    pub(crate) fn next() -> Self {
        Self(NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw numeric ID.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

type WidgetGetter = Box<dyn Fn() -> Option<WidgetId> + Send + Sync>;

/// One field of a target: a widget binding plus its rules.
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) widget: WidgetGetter,
    pub(crate) rules: Vec<RuleDescriptor>,
    pub(crate) condition: Option<ConditionDescriptor>,
}

impl FieldSpec {
    /// Create a field bound to a fixed widget ID.
    pub fn new(name: impl Into<String>, widget: impl Into<WidgetId>) -> Self {
        let widget = widget.into();
        Self::bound(name, move || Some(widget.clone()))
    }

    /// Create a field whose widget is resolved when the target's rules are
    /// indexed. Returning `None` skips the field for the life of that index.
    pub fn bound(
        name: impl Into<String>,
        widget: impl Fn() -> Option<WidgetId> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            widget: Box::new(widget),
            rules: Vec::new(),
            condition: None,
        }
    }

    /// Attach a rule to the field.
    pub fn rule(mut self, rule: RuleDescriptor) -> Self {
        self.rules.push(rule);
        self
    }

    /// Attach several rules to the field.
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleDescriptor>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Gate the field's rules behind a condition.
    pub fn condition(mut self, condition: ConditionDescriptor) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Get the field name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("rules", &self.rules.len())
            .field("condition", &self.condition)
            .finish()
    }
}

/// Declarative description of a validation target.
pub struct TargetSpec {
    pub(crate) name: String,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) condition_sources: Vec<WidgetId>,
}

impl TargetSpec {
    /// Create a target spec with a display name used in logs.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            condition_sources: Vec::new(),
        }
    }

    /// Add a field to the target.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare a widget that conditions may inspect even though no field of
    /// this target validates it.
    pub fn condition_source(mut self, widget: impl Into<WidgetId>) -> Self {
        self.condition_sources.push(widget.into());
        self
    }

    /// Get the target name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for TargetSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetSpec")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("condition_sources", &self.condition_sources)
            .finish()
    }
}

/// Arena slot for one registered target.
pub(crate) struct TargetRecord {
    pub(crate) spec: Arc<TargetSpec>,
    /// Bound rule index, built lazily on first validation.
    pub(crate) index: Option<Arc<TargetFieldIndex>>,
}

/// Owns all registered targets, keyed by handle.
pub(crate) struct TargetArena {
    records: HashMap<TargetId, TargetRecord>,
}

impl TargetArena {
    pub(crate) fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Store a spec and hand back its handle.
    pub(crate) fn insert(&mut self, spec: TargetSpec) -> TargetId {
        let id = TargetId::next();
        self.records.insert(
            id,
            TargetRecord {
                spec: Arc::new(spec),
                index: None,
            },
        );
        id
    }

    /// Drop a target. Returns whether the handle was present.
    pub(crate) fn remove(&mut self, id: TargetId) -> bool {
        self.records.remove(&id).is_some()
    }

    pub(crate) fn get(&self, id: TargetId) -> Option<&TargetRecord> {
        self.records.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TargetId) -> Option<&mut TargetRecord> {
        self.records.get_mut(&id)
    }

    /// Drop every built index. Returns whether any index was present.
    pub(crate) fn clear_indexes(&mut self) -> bool {
        let mut cleared = false;
        for record in self.records.values_mut() {
            cleared |= record.index.take().is_some();
        }
        cleared
    }
}
