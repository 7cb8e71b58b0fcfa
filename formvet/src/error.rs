//! Engine error types.

use thiserror::Error;

use crate::adapter::AdapterError;
use crate::condition::ConditionKind;
use crate::descriptor::RuleKind;
use crate::target::TargetId;
use crate::widget::WidgetId;

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors reported by engine operations.
///
/// These cover configuration and infrastructure problems. A field failing a
/// rule is not an error; it is reported through
/// [`ValidationReport`](crate::result::ValidationReport).
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// A shared engine lock was poisoned by a panicking thread.
    #[error("engine state lock poisoned while {0}")]
    StatePoisoned(&'static str),

    /// The target handle is unknown or was already released.
    #[error("unknown or released target: {0}")]
    UnknownTarget(TargetId),

    /// A validator or condition registration carried a blank kind.
    #[error("registration kind cannot be empty")]
    EmptyKind,

    /// A rule descriptor failed the validator's parameter check.
    #[error("rule '{kind}' on widget '{widget}' is misconfigured: {reason}")]
    InvalidRule {
        /// The offending rule kind.
        kind: RuleKind,
        /// The widget the rule is attached to.
        widget: WidgetId,
        /// What the validator objected to.
        reason: String,
    },

    /// The resolver produced no adapter for a widget.
    #[error("no field adapter for widget '{widget}'")]
    AdapterMissing {
        /// The widget without an adapter.
        widget: WidgetId,
        /// The rule kind the adapter was requested for, if any.
        kind: Option<RuleKind>,
    },

    /// An adapter failed to read a widget's value.
    #[error("failed to read value from widget '{widget}'")]
    ValueUnavailable {
        /// The unreadable widget.
        widget: WidgetId,
        /// The adapter's failure.
        #[source]
        source: AdapterError,
    },

    /// A condition referenced a widget the target does not declare.
    #[error("condition widget '{widget}' is not declared on the target")]
    ConditionWidgetUnknown {
        /// The undeclared widget.
        widget: WidgetId,
    },

    /// A condition referenced an unregistered evaluator kind.
    #[error("no condition evaluator registered for kind '{kind}'")]
    EvaluatorMissing {
        /// The unresolved evaluator kind.
        kind: ConditionKind,
    },
}
