//! Shared fixtures: an in-memory widget store and a scripted focus host.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use formvet::prelude::*;

/// In-memory widget values, acting as both resolver and adapter.
#[derive(Clone, Default)]
pub struct WidgetStore {
    inner: Arc<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    values: RwLock<HashMap<WidgetId, FieldValue>>,
    unreadable: RwLock<HashSet<WidgetId>>,
    unresolvable: RwLock<HashSet<WidgetId>>,
}

impl WidgetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, widget: &str, value: impl Into<FieldValue>) {
        self.inner
            .values
            .write()
            .unwrap()
            .insert(widget.into(), value.into());
    }

    /// Make the adapter fail reads for this widget.
    pub fn fail_reads(&self, widget: &str) {
        self.inner
            .unreadable
            .write()
            .unwrap()
            .insert(widget.into());
    }

    /// Make the resolver return no adapter for this widget.
    pub fn drop_adapter(&self, widget: &str) {
        self.inner
            .unresolvable
            .write()
            .unwrap()
            .insert(widget.into());
    }
}

impl AdapterResolver for WidgetStore {
    fn adapter_for(
        &self,
        widget: &WidgetId,
        _kind: Option<&RuleKind>,
    ) -> Option<Arc<dyn FieldAdapter>> {
        if self.inner.unresolvable.read().unwrap().contains(widget) {
            return None;
        }
        Some(Arc::new(self.clone()))
    }
}

impl FieldAdapter for WidgetStore {
    fn value(
        &self,
        _rule: Option<&RuleDescriptor>,
        _target: TargetId,
        widget: &WidgetId,
    ) -> Result<FieldValue, AdapterError> {
        if self.inner.unreadable.read().unwrap().contains(widget) {
            return Err(AdapterError::new(format!("widget '{widget}' is detached")));
        }
        Ok(self
            .inner
            .values
            .read()
            .unwrap()
            .get(widget)
            .cloned()
            .unwrap_or(FieldValue::Empty))
    }
}

/// Scripted focus host.
///
/// Deliberately reports a bogus old-focus widget on every event, the way
/// some toolkits do; sessions must track the leaving widget themselves.
#[derive(Clone, Default)]
pub struct TestHost {
    inner: Arc<HostInner>,
}

#[derive(Default)]
struct HostInner {
    listeners: Mutex<Vec<Arc<dyn FocusListener>>>,
    attaches: AtomicUsize,
    dead: AtomicBool,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move focus to a widget, or away from all widgets with `None`.
    pub fn focus(&self, widget: Option<&str>) {
        self.focus_with_old(Some("bogus_old_focus"), widget);
    }

    /// Deliver a focus change with an arbitrary (possibly wrong) old widget.
    pub fn focus_with_old(&self, old: Option<&str>, new: Option<&str>) {
        if self.inner.dead.load(Ordering::SeqCst) {
            return;
        }
        let old = old.map(WidgetId::from);
        let new = new.map(WidgetId::from);
        let listeners: Vec<_> = self.inner.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener.focus_changed(old.as_ref(), new.as_ref());
        }
    }

    /// Simulate the screen being torn down: detaches start failing.
    pub fn kill(&self) {
        self.inner.dead.store(true, Ordering::SeqCst);
    }

    /// Number of currently attached listeners.
    pub fn attached(&self) -> usize {
        self.inner.listeners.lock().unwrap().len()
    }

    /// Total number of attach calls seen.
    pub fn attach_count(&self) -> usize {
        self.inner.attaches.load(Ordering::SeqCst)
    }
}

impl FocusHost for TestHost {
    fn attach_listener(&self, listener: Arc<dyn FocusListener>) {
        self.inner.attaches.fetch_add(1, Ordering::SeqCst);
        self.inner.listeners.lock().unwrap().push(listener);
    }

    fn detach_listener(&self, listener: &Arc<dyn FocusListener>) -> bool {
        if self.inner.dead.load(Ordering::SeqCst) {
            return false;
        }
        let mut listeners = self.inner.listeners.lock().unwrap();
        let before = listeners.len();
        listeners.retain(|candidate| !Arc::ptr_eq(candidate, listener));
        listeners.len() < before
    }
}

/// Collects reports delivered to a continuous session callback.
#[derive(Clone, Default)]
pub struct ReportLog {
    reports: Arc<Mutex<Vec<ValidationReport>>>,
}

impl ReportLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback closure pushing into this log.
    pub fn callback(&self) -> impl Fn(&ValidationReport) + Send + Sync + 'static {
        let reports = Arc::clone(&self.reports);
        move |report| reports.lock().unwrap().push(report.clone())
    }

    pub fn reports(&self) -> Vec<ValidationReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}
