//! Errors raised by the validation engine
//!
//! An invalid object is *not* an error: failures are ordinary data inside a
//! [`ValidationResult`]. [`ValidationError`] is reserved for misuse of the engine
//! and for the opt-in `ensure_valid` mode.
//!
//! Predicates are plain functions returning `bool`. A predicate that panics is a
//! defect in that predicate; the engine does not catch the panic, so it unwinds
//! through `validate` / `validate_async` unchanged.

use crate::result::ValidationResult;

/// Errors returned by validators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The synchronous entry point was used on rules that can only run asynchronously.
    #[error(
        "rules for property `{property}` contain asynchronous predicates or conditions; \
         call validate_async instead of validate"
    )]
    AsyncRuleInSyncValidation {
        /// Key of the first offending property.
        property: String,
    },

    /// Returned by `ensure_valid` when the object has blocking failures.
    #[error("validation failed:\n{0}")]
    Invalid(ValidationResult),

    /// A locale was selected that has no registered message table.
    #[error("no message table registered for locale `{0}`")]
    UnknownLocale(String),
}

impl ValidationError {
    pub(crate) fn async_misuse(property: impl Into<String>) -> Self {
        ValidationError::AsyncRuleInSyncValidation {
            property: property.into(),
        }
    }

    /// The failing result carried by [`ValidationError::Invalid`].
    pub fn result(&self) -> Option<&ValidationResult> {
        match self {
            ValidationError::Invalid(result) => Some(result),
            _ => None,
        }
    }
}
