//! Continuous focus-driven validation sessions.
//!
//! A session attaches one listener to the application's [`FocusHost`]. When
//! focus moves off a widget with rules, just that field is validated and the
//! session's callback fires on failure. The full-target pass stays with
//! [`validate`](crate::engine::ValidationEngine::validate); sessions only
//! give early per-field feedback.

use std::sync::{Arc, Mutex, Weak};

use log::{debug, error, trace};

use crate::engine::{read_lock, EngineShared};
use crate::executor::{self, ExecEnv};
use crate::focus::{FocusHost, FocusListener};
use crate::index::TargetFieldIndex;
use crate::message::MessageContext;
use crate::result::ValidationReport;
use crate::target::TargetId;
use crate::widget::WidgetId;

pub(crate) type ReportCallback = Arc<dyn Fn(&ValidationReport) + Send + Sync>;

/// An active session: the listener plus the host it is attached to.
pub(crate) struct ContinuousSession {
    pub(crate) listener: Arc<SessionListener>,
    pub(crate) host: Arc<dyn FocusHost>,
}

/// Focus listener that validates the field losing focus.
pub(crate) struct SessionListener {
    /// Weak so a session never keeps a dropped engine alive; events arriving
    /// after the engine is gone are ignored.
    engine: Weak<EngineShared>,
    target: TargetId,
    /// Index captured at session start. A later
    /// [`clear_caches`](crate::engine::ValidationEngine::clear_caches) does
    /// not touch running sessions.
    index: Arc<TargetFieldIndex>,
    cx: MessageContext,
    callback: ReportCallback,
    /// The widget that currently holds focus, tracked here because the
    /// host's own old-focus argument cannot be trusted.
    last_focus: Mutex<Option<WidgetId>>,
}

impl SessionListener {
    pub(crate) fn new(
        engine: Weak<EngineShared>,
        target: TargetId,
        index: Arc<TargetFieldIndex>,
        cx: MessageContext,
        callback: ReportCallback,
    ) -> Self {
        Self {
            engine,
            target,
            index,
            cx,
            callback,
            last_focus: Mutex::new(None),
        }
    }
}

impl FocusListener for SessionListener {
    fn focus_changed(&self, _old: Option<&WidgetId>, new: Option<&WidgetId>) {
        let Some(shared) = self.engine.upgrade() else {
            return;
        };

        let mut last = self
            .last_focus
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if last.as_ref() == new {
            return;
        }
        let leaving = last.take();
        *last = new.cloned();
        drop(last);

        let Some(widget) = leaving else {
            return;
        };
        let Some(record) = self.index.record_for(&widget) else {
            trace!("{}: no rules on widget '{widget}', blur ignored", self.target);
            return;
        };

        // Snapshot: the callback may re-enter the engine, so nothing below
        // runs with an engine lock held.
        let conditions = match read_lock(&shared.conditions, "evaluating conditions") {
            Ok(guard) => guard.clone(),
            Err(err) => {
                error!("{err}");
                return;
            }
        };
        let env = ExecEnv {
            target: self.target,
            resolver: shared.resolver.as_ref(),
            conditions: &conditions,
            cx: &self.cx,
        };
        match executor::validate_field(&env, &self.index, record) {
            Ok(Some(failure)) => {
                debug!("{}: field '{}' failed on blur", self.target, failure.field);
                (self.callback)(&ValidationReport::Failed(vec![failure]));
            }
            Ok(None) => {}
            Err(err) => {
                error!(
                    "{}: continuous validation of widget '{widget}' failed: {err}",
                    self.target
                );
            }
        }
    }
}
