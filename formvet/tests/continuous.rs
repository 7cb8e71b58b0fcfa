//! Tests for continuous focus-driven validation.

mod common;

use std::sync::{Arc, Mutex};

use common::{ReportLog, TestHost, WidgetStore};
use formvet::prelude::*;

struct Fixture {
    store: WidgetStore,
    engine: ValidationEngine,
    host: Arc<TestHost>,
    log: ReportLog,
    target: TargetId,
}

/// A signup form: empty name (failing) and a valid email (passing).
fn signup_fixture() -> Fixture {
    let store = WidgetStore::new();
    store.set("name_input", "");
    store.set("email_input", "user@example.com");
    let engine = ValidationEngine::new(Arc::new(store.clone()));
    let target = engine
        .register_target(
            TargetSpec::new("signup")
                .field(FieldSpec::new("name", "name_input").rule(not_empty()))
                .field(FieldSpec::new("email", "email_input").rule(email())),
        )
        .unwrap();
    Fixture {
        store,
        engine,
        host: Arc::new(TestHost::new()),
        log: ReportLog::new(),
        target,
    }
}

fn start(fx: &Fixture) {
    fx.engine
        .start_continuous_validation(
            MessageContext::new(),
            fx.target,
            fx.host.clone(),
            fx.log.callback(),
        )
        .unwrap();
}

#[test]
fn test_blur_validates_the_leaving_field() {
    let fx = signup_fixture();
    start(&fx);
    assert_eq!(fx.host.attach_count(), 1);

    // Focus arriving somewhere is not a blur: nothing to validate yet.
    fx.host.focus(Some("name_input"));
    assert_eq!(fx.log.count(), 0);

    // Leaving the empty name field reports its failure.
    fx.host.focus(Some("email_input"));
    assert_eq!(fx.log.count(), 1);
    let report = &fx.log.reports()[0];
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].field, "name");

    // Leaving the valid email field stays silent.
    fx.host.focus(None);
    assert_eq!(fx.log.count(), 1);
}

#[test]
fn test_host_old_focus_argument_is_ignored() {
    let fx = signup_fixture();
    start(&fx);

    // The host claims focus left the failing name field, but nothing had
    // focus yet; a session trusting the host would report here.
    fx.host.focus_with_old(Some("name_input"), Some("email_input"));
    assert_eq!(fx.log.count(), 0);

    // And here the host claims no widget lost focus, while the session
    // knows the email field did.
    fx.store.set("email_input", "broken@");
    fx.host.focus_with_old(None, None);
    assert_eq!(fx.log.count(), 1);
    assert_eq!(fx.log.reports()[0].failures()[0].field, "email");
}

#[test]
fn test_refocus_of_same_widget_is_ignored() {
    let fx = signup_fixture();
    start(&fx);

    fx.host.focus(Some("name_input"));
    fx.host.focus(Some("name_input"));
    assert_eq!(fx.log.count(), 0);

    fx.host.focus(Some("email_input"));
    assert_eq!(fx.log.count(), 1);
}

#[test]
fn test_blur_report_covers_only_the_leaving_field() {
    let fx = signup_fixture();
    // Both fields failing.
    fx.store.set("email_input", "not-an-email");
    start(&fx);

    fx.host.focus(Some("name_input"));
    fx.host.focus(Some("email_input"));

    // Only the name failure is in the report, not the email one.
    let reports = fx.log.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].failures().len(), 1);
    assert_eq!(reports[0].failures()[0].field, "name");
}

#[test]
fn test_widgets_without_rules_are_silent() {
    let fx = signup_fixture();
    start(&fx);

    fx.host.focus(Some("decorative_frame"));
    fx.host.focus(Some("other_frame"));
    fx.host.focus(None);
    assert_eq!(fx.log.count(), 0);
}

#[test]
fn test_second_start_is_a_no_op() {
    let fx = signup_fixture();
    start(&fx);
    start(&fx);
    assert_eq!(fx.host.attach_count(), 1);

    fx.host.focus(Some("name_input"));
    fx.host.focus(None);
    assert_eq!(fx.log.count(), 1);
}

#[test]
fn test_stop_detaches_and_reports_it() {
    let fx = signup_fixture();
    start(&fx);
    assert_eq!(fx.host.attached(), 1);

    assert!(fx.engine.stop_continuous_validation(fx.target).unwrap());
    assert_eq!(fx.host.attached(), 0);

    // No session left to stop.
    assert!(!fx.engine.stop_continuous_validation(fx.target).unwrap());
}

#[test]
fn test_stop_without_session_is_false() {
    let fx = signup_fixture();
    assert!(!fx.engine.stop_continuous_validation(fx.target).unwrap());
}

#[test]
fn test_stop_on_dead_host_discards_session_anyway() {
    let fx = signup_fixture();
    start(&fx);
    fx.host.kill();

    // The host cannot detach anymore, so stop reports false, but the
    // session itself is gone.
    assert!(!fx.engine.stop_continuous_validation(fx.target).unwrap());
    assert!(!fx.engine.stop_continuous_validation(fx.target).unwrap());

    // A fresh start attaches a new listener.
    start(&fx);
    assert_eq!(fx.host.attach_count(), 2);
}

/// Host that stops the target's session from inside `attach_listener`, which
/// lands the stop between the session being recorded and the listener
/// reaching the host.
struct StoppingHost {
    inner: TestHost,
    engine: ValidationEngine,
    target: TargetId,
}

impl FocusHost for StoppingHost {
    fn attach_listener(&self, listener: Arc<dyn FocusListener>) {
        self.engine.stop_continuous_validation(self.target).unwrap();
        self.inner.attach_listener(listener);
    }

    fn detach_listener(&self, listener: &Arc<dyn FocusListener>) -> bool {
        self.inner.detach_listener(listener)
    }
}

#[test]
fn test_stop_during_attach_leaves_nothing_attached() {
    let fx = signup_fixture();
    let host = Arc::new(StoppingHost {
        inner: TestHost::new(),
        engine: fx.engine.clone(),
        target: fx.target,
    });

    fx.engine
        .start_continuous_validation(
            MessageContext::new(),
            fx.target,
            host.clone(),
            fx.log.callback(),
        )
        .unwrap();

    // The stop won: the listener attached afterwards must not linger.
    assert_eq!(host.inner.attached(), 0);
    assert!(!fx.engine.stop_continuous_validation(fx.target).unwrap());
}

#[test]
fn test_release_target_stops_its_session() {
    let fx = signup_fixture();
    start(&fx);
    assert_eq!(fx.host.attached(), 1);

    assert!(fx.engine.release_target(fx.target).unwrap());
    assert_eq!(fx.host.attached(), 0);
    assert!(!fx.engine.stop_continuous_validation(fx.target).unwrap());
}

#[test]
fn test_start_with_stale_target_errors() {
    let fx = signup_fixture();
    fx.engine.release_target(fx.target).unwrap();

    let err = fx
        .engine
        .start_continuous_validation(
            MessageContext::new(),
            fx.target,
            fx.host.clone(),
            fx.log.callback(),
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownTarget(id) if id == fx.target));
}

#[test]
fn test_conditions_reevaluated_on_every_blur() {
    let store = WidgetStore::new();
    store.set("business_checkbox", true);
    store.set("vat_input", "");
    let engine = ValidationEngine::new(Arc::new(store.clone()));
    let target = engine
        .register_target(
            TargetSpec::new("billing")
                .field(
                    FieldSpec::new("vat", "vat_input")
                        .rule(not_empty())
                        .condition(when_checked("business_checkbox")),
                )
                .condition_source("business_checkbox"),
        )
        .unwrap();
    let host = Arc::new(TestHost::new());
    let log = ReportLog::new();
    engine
        .start_continuous_validation(MessageContext::new(), target, host.clone(), log.callback())
        .unwrap();

    // Business customer: leaving the empty vat field reports.
    host.focus(Some("vat_input"));
    host.focus(None);
    assert_eq!(log.count(), 1);

    // Checkbox flipped off: the same blur is now gated away.
    store.set("business_checkbox", false);
    host.focus(Some("vat_input"));
    host.focus(None);
    assert_eq!(log.count(), 1);
}

#[test]
fn test_session_keeps_its_index_across_clear_caches() {
    let fx = signup_fixture();
    start(&fx);

    // Starting the session built and cached an index; clearing drops it.
    assert!(fx.engine.clear_caches().unwrap());

    fx.host.focus(Some("name_input"));
    fx.host.focus(None);
    assert_eq!(fx.log.count(), 1);
}

#[test]
fn test_read_failure_on_blur_is_logged_not_reported() {
    let fx = signup_fixture();
    start(&fx);

    fx.host.focus(Some("name_input"));
    fx.store.fail_reads("name_input");
    // The blur still happens, but the value cannot be read; the callback
    // must not fire with a made-up report.
    fx.host.focus(None);
    assert_eq!(fx.log.count(), 0);
}

struct AlwaysOn;

impl ConditionEvaluator for AlwaysOn {
    fn evaluate(&self, _value: &FieldValue) -> bool {
        true
    }
}

#[test]
fn test_callback_may_reenter_the_engine() {
    let fx = signup_fixture();
    let engine = fx.engine.clone();
    let target = fx.target;
    let revalidations = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&revalidations);
    fx.engine
        .start_continuous_validation(MessageContext::new(), target, fx.host.clone(), move |_| {
            // React the way an application might: reconfigure the engine,
            // then run a full pass, all from inside the callback.
            engine
                .register_condition(ConditionRegistration::new(
                    ConditionKind::from_static("always_on"),
                    || Box::new(AlwaysOn) as Box<dyn ConditionEvaluator>,
                ))
                .unwrap();
            let report = engine.validate(&MessageContext::new(), target).unwrap();
            sink.lock().unwrap().push(report);
        })
        .unwrap();

    fx.host.focus(Some("name_input"));
    fx.host.focus(None);

    let reports = revalidations.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].failures()[0].field, "name");
}

#[test]
fn test_dropped_engine_leaves_listener_inert() {
    let fx = signup_fixture();
    start(&fx);

    let Fixture { host, log, engine, .. } = fx;
    drop(engine);
    // All engine clones dropped; the host still owns the listener.
    host.focus(Some("name_input"));
    host.focus(None);
    assert_eq!(log.count(), 0);
}
