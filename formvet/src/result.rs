//! Validation outcome types.

use serde::{Deserialize, Serialize};

use crate::widget::WidgetId;

/// Information about a single field validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Widget the failing rule was bound to (for focusing).
    pub widget: WidgetId,
    /// Field name (from the [`FieldSpec`](crate::target::FieldSpec)).
    pub field: String,
    /// Resolved failure message.
    pub message: String,
    /// The failing rule's sort order.
    pub order: i32,
}

/// Result of validating a target.
///
/// At most one failure is reported per field: rules run in their declared
/// order and the first failing rule wins. Failures are sorted ascending by
/// rule order across the whole target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ValidationReport {
    /// Every field passed.
    #[default]
    Passed,
    /// One or more fields failed.
    Failed(Vec<ValidationFailure>),
}

impl ValidationReport {
    /// Check if all fields passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if any field failed validation.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Get all validation failures.
    pub fn failures(&self) -> &[ValidationFailure] {
        match self {
            Self::Passed => &[],
            Self::Failed(failures) => failures,
        }
    }

    /// Get the first validation failure (if any).
    pub fn first_failure(&self) -> Option<&ValidationFailure> {
        self.failures().first()
    }

    /// Get the widget of the first failing field (for focusing).
    pub fn first_failed_widget(&self) -> Option<&WidgetId> {
        self.first_failure().map(|failure| &failure.widget)
    }
}
