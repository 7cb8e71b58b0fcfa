//! The engine facade.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use crate::adapter::AdapterResolver;
use crate::condition::ConditionRegistration;
use crate::continuous::{ContinuousSession, SessionListener};
use crate::error::{EngineError, EngineResult};
use crate::executor::{self, ExecEnv};
use crate::focus::{FocusHost, FocusListener};
use crate::index::{build_index, TargetFieldIndex};
use crate::message::MessageContext;
use crate::registry::{ConditionRegistry, ValidatorRegistry};
use crate::result::ValidationReport;
use crate::target::{TargetArena, TargetId, TargetSpec};
use crate::validator::ValidatorRegistration;

/// Engine state shared by all clones of the facade and by session listeners.
pub(crate) struct EngineShared {
    pub(crate) validators: RwLock<ValidatorRegistry>,
    pub(crate) conditions: RwLock<ConditionRegistry>,
    pub(crate) arena: RwLock<TargetArena>,
    pub(crate) sessions: RwLock<HashMap<TargetId, ContinuousSession>>,
    pub(crate) resolver: Arc<dyn AdapterResolver>,
    /// Serializes one-shot validation passes across clones and threads.
    validate_gate: Mutex<()>,
}

/// Acquire a read guard, mapping poisoning to an engine error.
pub(crate) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> EngineResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| EngineError::StatePoisoned(context))
}

/// Acquire a write guard, mapping poisoning to an engine error.
pub(crate) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> EngineResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| EngineError::StatePoisoned(context))
}

/// Declarative field validation over registered targets.
///
/// The engine owns the validator and condition registries, the registered
/// targets and any continuous sessions. It is cheap to clone; clones share
/// state, so an application typically creates one engine and hands clones to
/// whoever validates.
///
/// # Example
///
/// ```ignore
/// let engine = ValidationEngine::new(resolver);
/// let target = engine.register_target(
///     TargetSpec::new("signup").field(
///         FieldSpec::new("email", "email_input")
///             .rule(not_empty().order(1))
///             .rule(email().order(2)),
///     ),
/// )?;
///
/// let report = engine.validate(&MessageContext::new(), target)?;
/// if let Some(widget) = report.first_failed_widget() {
///     // focus the widget, surface report.failures()
/// }
/// ```
#[derive(Clone)]
pub struct ValidationEngine {
    shared: Arc<EngineShared>,
}

impl ValidationEngine {
    /// Create an engine using the given resolver to read widget values.
    ///
    /// The registries start seeded with every validator and condition
    /// evaluator registered via inventory, including the built-ins.
    pub fn new(resolver: Arc<dyn AdapterResolver>) -> Self {
        let validators = ValidatorRegistry::seeded();
        let conditions = ConditionRegistry::seeded();
        debug!(
            "engine created with {} validators and {} condition evaluators",
            validators.len(),
            conditions.len()
        );
        Self {
            shared: Arc::new(EngineShared {
                validators: RwLock::new(validators),
                conditions: RwLock::new(conditions),
                arena: RwLock::new(TargetArena::new()),
                sessions: RwLock::new(HashMap::new()),
                resolver,
                validate_gate: Mutex::new(()),
            }),
        }
    }

    /// Register a validator at runtime, replacing any previous one of the
    /// same kind.
    ///
    /// Targets validated before this call keep their already-bound instances
    /// until [`clear_caches`](Self::clear_caches) drops the indexes.
    pub fn register_validator(&self, registration: ValidatorRegistration) -> EngineResult<()> {
        if registration.kind.as_str().trim().is_empty() {
            return Err(EngineError::EmptyKind);
        }
        write_lock(&self.shared.validators, "registering validator")?
            .register(registration.kind, registration.factory);
        Ok(())
    }

    /// Register a condition evaluator at runtime, replacing any previous one
    /// of the same kind.
    pub fn register_condition(&self, registration: ConditionRegistration) -> EngineResult<()> {
        if registration.kind.as_str().trim().is_empty() {
            return Err(EngineError::EmptyKind);
        }
        write_lock(&self.shared.conditions, "registering condition evaluator")?
            .register(registration.kind, registration.factory);
        Ok(())
    }

    /// Register a target and get back its handle.
    pub fn register_target(&self, spec: TargetSpec) -> EngineResult<TargetId> {
        let name = spec.name().to_string();
        let id = write_lock(&self.shared.arena, "registering target")?.insert(spec);
        debug!("{id}: registered target '{name}'");
        Ok(id)
    }

    /// Release a target, dropping its spec, cached index and any continuous
    /// session. Returns whether the handle was still registered.
    pub fn release_target(&self, target: TargetId) -> EngineResult<bool> {
        let removed = write_lock(&self.shared.arena, "releasing target")?.remove(target);
        if removed {
            self.stop_continuous_validation(target)?;
            debug!("{target}: released");
        }
        Ok(removed)
    }

    /// Drop every cached rule index. Returns whether any index existed.
    ///
    /// The next validation of each target rebuilds its index, picking up
    /// validators registered in the meantime. Running continuous sessions
    /// keep the index they were started with.
    pub fn clear_caches(&self) -> EngineResult<bool> {
        let cleared = write_lock(&self.shared.arena, "clearing rule indexes")?.clear_indexes();
        if cleared {
            debug!("rule indexes cleared");
        }
        Ok(cleared)
    }

    /// Validate every field of a target against its rules.
    ///
    /// Rules read live widget values through the resolver. Within a field
    /// the first failing rule wins; failures across fields are sorted
    /// ascending by rule order. A target with no applicable rules passes.
    pub fn validate(
        &self,
        cx: &MessageContext,
        target: TargetId,
    ) -> EngineResult<ValidationReport> {
        let _gate = self
            .shared
            .validate_gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let index = self.ensure_index(target)?;
        // Snapshot: no registry lock is held while rules run, so validators
        // and adapters may register with the engine.
        let conditions = read_lock(&self.shared.conditions, "evaluating conditions")?.clone();
        let env = ExecEnv {
            target,
            resolver: self.shared.resolver.as_ref(),
            conditions: &conditions,
            cx,
        };
        let report = executor::validate_target(&env, &index)?;
        match &report {
            ValidationReport::Passed => debug!("{target}: validation passed"),
            ValidationReport::Failed(failures) => {
                debug!("{target}: validation failed on {} field(s)", failures.len());
            }
        }
        Ok(report)
    }

    /// Start validating the target's fields as they lose focus.
    ///
    /// Attaches a listener to `host`; whenever focus moves off one of the
    /// target's widgets, that field alone is validated and `callback`
    /// receives a report on failure. Passing fields stay silent. A second
    /// start for the same target is a no-op while the first session runs.
    pub fn start_continuous_validation(
        &self,
        cx: MessageContext,
        target: TargetId,
        host: Arc<dyn FocusHost>,
        callback: impl Fn(&ValidationReport) + Send + Sync + 'static,
    ) -> EngineResult<()> {
        {
            let sessions = read_lock(&self.shared.sessions, "checking continuous sessions")?;
            if sessions.contains_key(&target) {
                debug!("{target}: continuous validation already active");
                return Ok(());
            }
        }

        let index = self.ensure_index(target)?;
        let listener = Arc::new(SessionListener::new(
            Arc::downgrade(&self.shared),
            target,
            index,
            cx,
            Arc::new(callback),
        ));

        {
            let mut sessions = write_lock(&self.shared.sessions, "registering continuous session")?;
            if sessions.contains_key(&target) {
                return Ok(());
            }
            sessions.insert(
                target,
                ContinuousSession {
                    listener: Arc::clone(&listener),
                    host: Arc::clone(&host),
                },
            );
        }
        let dyn_listener: Arc<dyn FocusListener> = listener.clone();
        host.attach_listener(dyn_listener);

        // A stop can land between recording the session and attaching; if
        // the session is gone (or already replaced), take this listener
        // back off the host.
        let current = read_lock(&self.shared.sessions, "checking continuous sessions")?
            .get(&target)
            .is_some_and(|session| Arc::ptr_eq(&session.listener, &listener));
        if !current {
            let listener: Arc<dyn FocusListener> = listener;
            host.detach_listener(&listener);
            debug!("{target}: continuous validation stopped during start");
            return Ok(());
        }
        debug!("{target}: continuous validation started");
        Ok(())
    }

    /// Stop the target's continuous session, if any.
    ///
    /// The session is discarded either way; the returned bool reports
    /// whether the host actually removed the listener, which is `false` for
    /// hosts whose screen is already gone.
    pub fn stop_continuous_validation(&self, target: TargetId) -> EngineResult<bool> {
        let session = write_lock(&self.shared.sessions, "removing continuous session")?
            .remove(&target);
        let Some(session) = session else {
            return Ok(false);
        };
        let listener: Arc<dyn FocusListener> = session.listener;
        let detached = session.host.detach_listener(&listener);
        debug!("{target}: continuous validation stopped (listener detached: {detached})");
        Ok(detached)
    }

    /// Get the target's cached index, building and storing it if absent.
    fn ensure_index(&self, target: TargetId) -> EngineResult<Arc<TargetFieldIndex>> {
        let spec = {
            let arena = read_lock(&self.shared.arena, "reading target")?;
            let record = arena
                .get(target)
                .ok_or(EngineError::UnknownTarget(target))?;
            if let Some(index) = &record.index {
                return Ok(Arc::clone(index));
            }
            Arc::clone(&record.spec)
        };

        // Built outside the arena lock; when two builds race, the later
        // store wins.
        let index = {
            let mut validators = write_lock(&self.shared.validators, "binding validators")?;
            Arc::new(build_index(target, &spec, &mut validators)?)
        };

        let mut arena = write_lock(&self.shared.arena, "storing rule index")?;
        match arena.get_mut(target) {
            Some(record) => {
                record.index = Some(Arc::clone(&index));
                Ok(index)
            }
            None => Err(EngineError::UnknownTarget(target)),
        }
    }
}
