//! Built-in validators.
//!
//! Each rule kind ships with a constructor function that builds a ready
//! [`RuleDescriptor`](crate::descriptor::RuleDescriptor), e.g.
//! `min_length(3)` or `pattern(r"^\d+$")`. Descriptors can also be built by
//! hand or deserialized; the constructors only set the right kind and
//! parameters.
//!
//! Rules apply to the value kinds they understand. A value outside a rule's
//! domain passes (with a warning for clearly misconfigured pairings), so
//! presence is always asserted explicitly with [`not_empty`], [`checked`] or
//! [`selected`] rather than implied by other rules.
//! [`FieldValue::Empty`](crate::value::FieldValue::Empty) likewise passes
//! everything except those three.

mod choice;
mod numeric;
mod text;

pub use choice::{checked, selected, CHECKED, SELECTED};
pub use numeric::{max_value, min_value, MAX_VALUE, MIN_VALUE};
pub use text::{
    email, max_length, min_length, not_empty, pattern, EMAIL, MAX_LENGTH, MIN_LENGTH, NOT_EMPTY,
    PATTERN,
};
