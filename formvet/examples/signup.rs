//! Signup Form Example
//!
//! Drives the validation engine against a tiny in-memory "screen":
//! - fields declared with builders and built-in rules
//! - a VAT field gated on a business checkbox
//! - continuous validation reporting as focus walks the form
//! - a final one-shot pass before submitting
//!
//! Engine logs land in signup.log.

use std::collections::HashMap;
use std::fs::File;
use std::sync::{Arc, Mutex, RwLock};

use formvet::prelude::*;
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

// ============================================================================
// A stand-in screen: widget values plus focus dispatch
// ============================================================================

#[derive(Clone, Default)]
struct Screen {
    inner: Arc<ScreenInner>,
}

#[derive(Default)]
struct ScreenInner {
    values: RwLock<HashMap<WidgetId, FieldValue>>,
    listeners: Mutex<Vec<Arc<dyn FocusListener>>>,
    focus: Mutex<Option<WidgetId>>,
}

impl Screen {
    fn set(&self, widget: &str, value: impl Into<FieldValue>) {
        self.inner
            .values
            .write()
            .unwrap()
            .insert(widget.into(), value.into());
    }

    /// Move focus, notifying listeners the way a toolkit would.
    fn focus(&self, widget: Option<&str>) {
        let new = widget.map(WidgetId::from);
        let old = {
            let mut focus = self.inner.focus.lock().unwrap();
            std::mem::replace(&mut *focus, new.clone())
        };
        let listeners: Vec<_> = self.inner.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener.focus_changed(old.as_ref(), new.as_ref());
        }
    }
}

impl AdapterResolver for Screen {
    fn adapter_for(
        &self,
        _widget: &WidgetId,
        _kind: Option<&RuleKind>,
    ) -> Option<Arc<dyn FieldAdapter>> {
        Some(Arc::new(self.clone()))
    }
}

impl FieldAdapter for Screen {
    fn value(
        &self,
        _rule: Option<&RuleDescriptor>,
        _target: TargetId,
        widget: &WidgetId,
    ) -> Result<FieldValue, AdapterError> {
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

impl FocusHost for Screen {
    fn attach_listener(&self, listener: Arc<dyn FocusListener>) {
        self.inner.listeners.lock().unwrap().push(listener);
    }

    fn detach_listener(&self, listener: &Arc<dyn FocusListener>) -> bool {
        let mut listeners = self.inner.listeners.lock().unwrap();
        let before = listeners.len();
        listeners.retain(|candidate| !Arc::ptr_eq(candidate, listener));
        listeners.len() < before
    }
}

// ============================================================================
// The signup form
// ============================================================================

fn signup_target() -> TargetSpec {
    TargetSpec::new("signup")
        .field(FieldSpec::new("name", "name_input").rule(not_empty().order(1)))
        .field(
            FieldSpec::new("email", "email_input")
                .rule(not_empty().order(2))
                .rule(email().order(3)),
        )
        .field(
            FieldSpec::new("password", "password_input")
                .rule(not_empty().order(4))
                .rule(min_length(8).order(5)),
        )
        .field(
            FieldSpec::new("vat", "vat_input")
                .rule(not_empty().order(6))
                .rule(
                    pattern(r"^[A-Z]{2}\d{8}$")
                        .order(7)
                        .message("VAT must look like CZ12345678"),
                )
                .condition(when_checked("business_checkbox")),
        )
        .field(
            FieldSpec::new("terms", "terms_checkbox")
                .rule(checked().order(8).message("You must accept the terms")),
        )
        .condition_source("business_checkbox")
}

fn print_report(heading: &str, report: &ValidationReport) {
    if report.is_valid() {
        println!("{heading}: all good");
        return;
    }
    println!("{heading}:");
    for failure in report.failures() {
        println!("  [{}] {}: {}", failure.widget, failure.field, failure.message);
    }
}

fn main() {
    let log_file = File::create("signup.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let screen = Screen::default();
    screen.set("name_input", "Ada Lovelace");
    screen.set("email_input", "ada.lovelace");
    screen.set("password_input", "short");
    screen.set("business_checkbox", true);
    screen.set("vat_input", "");
    screen.set("terms_checkbox", false);

    let engine = ValidationEngine::new(Arc::new(screen.clone()));
    let target = engine
        .register_target(signup_target())
        .expect("Failed to register target");

    let messages = MessageContext::new()
        .template("not_empty", "This field is required")
        .template("min_length", "Use at least {min} characters");

    // Continuous feedback while focus walks the form.
    engine
        .start_continuous_validation(messages.clone(), target, Arc::new(screen.clone()), |report| {
            print_report("on blur", report);
        })
        .expect("Failed to start continuous validation");

    println!("-- user tabs through the form --");
    screen.focus(Some("name_input"));
    screen.focus(Some("email_input")); // leaving name: fine
    screen.focus(Some("password_input")); // leaving email: bad address
    screen.focus(Some("vat_input")); // leaving password: too short
    screen.focus(None); // leaving vat: empty while business is checked

    // Submit attempt with the form still broken.
    println!("-- user hits submit --");
    let report = engine
        .validate(&messages, target)
        .expect("Failed to validate");
    print_report("submit", &report);
    if let Some(widget) = report.first_failed_widget() {
        println!("focusing '{widget}'");
    }

    // The user fixes everything and resubmits.
    screen.set("email_input", "ada@example.com");
    screen.set("password_input", "difference-engine");
    screen.set("vat_input", "CZ12345678");
    screen.set("terms_checkbox", true);

    println!("-- user fixes the form and resubmits --");
    let report = engine
        .validate(&messages, target)
        .expect("Failed to validate");
    print_report("submit", &report);
    if report.is_valid() {
        println!("account created");
    }

    engine
        .stop_continuous_validation(target)
        .expect("Failed to stop continuous validation");
    engine
        .release_target(target)
        .expect("Failed to release target");
}
