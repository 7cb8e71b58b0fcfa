pub mod adapter;
pub mod condition;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod focus;
pub mod message;
pub mod result;
pub mod target;
pub mod validator;
pub mod validators;
pub mod value;
pub mod widget;

mod continuous;
mod executor;
mod index;
mod registry;

pub use engine::ValidationEngine;

pub mod prelude {
    pub use crate::adapter::{AdapterError, AdapterResolver, FieldAdapter};
    pub use crate::condition::{
        when_checked, when_has_text, when_unchecked, ConditionDescriptor, ConditionEvaluator,
        ConditionGate, ConditionKind, ConditionRegistration,
    };
    pub use crate::descriptor::{ParamValue, RuleDescriptor, RuleKind};
    pub use crate::engine::ValidationEngine;
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::focus::{FocusHost, FocusListener};
    pub use crate::message::MessageContext;
    pub use crate::result::{ValidationFailure, ValidationReport};
    pub use crate::target::{FieldSpec, TargetId, TargetSpec};
    pub use crate::validator::{Validator, ValidatorRegistration};
    pub use crate::validators::{
        checked, email, max_length, max_value, min_length, min_value, not_empty, pattern, selected,
    };
    pub use crate::value::FieldValue;
    pub use crate::widget::WidgetId;
}
