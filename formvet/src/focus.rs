//! Focus-change events for continuous validation.
//!
//! The engine never polls widgets; the embedding toolkit pushes focus
//! changes through these traits. A [`FocusHost`] is whatever owns focus for
//! a screen and fans events out to attached listeners.

use std::sync::Arc;

use crate::widget::WidgetId;

/// Receives focus-change notifications from a [`FocusHost`].
pub trait FocusListener: Send + Sync {
    /// Called when focus moves.
    ///
    /// `old` is whatever the toolkit reports as the previously focused
    /// widget and `new` whatever now holds focus, either being `None` when
    /// focus left the widget tree. Listeners should not trust `old`: some
    /// toolkits report it wrong, so the engine tracks the leaving widget
    /// itself.
    fn focus_changed(&self, old: Option<&WidgetId>, new: Option<&WidgetId>);
}

/// A source of focus-change events.
pub trait FocusHost: Send + Sync {
    /// Attach a listener. The host keeps its own reference and delivers
    /// events until the listener is detached.
    fn attach_listener(&self, listener: Arc<dyn FocusListener>);

    /// Detach a previously attached listener, matched by pointer identity.
    ///
    /// Returns whether a listener was removed. Hosts whose underlying screen
    /// is already gone return `false`.
    fn detach_listener(&self, listener: &Arc<dyn FocusListener>) -> bool;
}
