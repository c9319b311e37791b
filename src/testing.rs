//! Testing utilities for code that declares validators
//!
//! Assertion macros that print the full failure list when they panic, plus
//! property-based testing support behind the `proptest` feature.
//!
//! # Examples
//!
//! ```rust
//! use ruleflow::prelude::*;
//! use ruleflow::{assert_failure_for, assert_invalid, assert_valid};
//!
//! struct Login {
//!     user: String,
//! }
//!
//! let validator = Validator::builder()
//!     .rule_for("user", |l: &Login| l.user.clone())
//!     .rule(required())
//!     .build();
//!
//! assert_valid!(validator.validate(&Login { user: "ada".into() }).unwrap());
//!
//! let result = validator.validate(&Login { user: String::new() }).unwrap();
//! assert_invalid!(result);
//! assert_failure_for!(result, "user");
//! ```

/// Assert that a validation result is valid.
///
/// Warnings and info failures are allowed. Panics with every blocking message
/// otherwise.
///
/// # Example
///
/// ```rust
/// use ruleflow::{assert_valid, Severity, ValidationFailure, ValidationResult};
///
/// let result = ValidationResult::new(vec![
///     ValidationFailure::new("bio", "short").with_severity(Severity::Warning),
/// ]);
/// assert_valid!(result);
/// ```
#[macro_export]
macro_rules! assert_valid {
    ($result:expr) => {
        match &$result {
            result => {
                let result: &$crate::ValidationResult = result;
                if !result.is_valid() {
                    panic!("Expected valid result, got failures:\n{}", result);
                }
            }
        }
    };
}

/// Assert that a validation result is invalid.
///
/// # Example
///
/// ```rust
/// use ruleflow::{assert_invalid, ValidationFailure, ValidationResult};
///
/// let result = ValidationResult::new(vec![ValidationFailure::new("name", "required")]);
/// assert_invalid!(result);
/// ```
#[macro_export]
macro_rules! assert_invalid {
    ($result:expr) => {
        match &$result {
            result => {
                let result: &$crate::ValidationResult = result;
                if result.is_valid() {
                    panic!(
                        "Expected invalid result, got {} non-blocking failure(s): {:?}",
                        result.len(),
                        result.failures()
                    );
                }
            }
        }
    };
}

/// Assert that at least one failure was recorded for a property key.
///
/// # Example
///
/// ```rust
/// use ruleflow::{assert_failure_for, ValidationFailure, ValidationResult};
///
/// let result = ValidationResult::new(vec![ValidationFailure::new("address.city", "required")]);
/// assert_failure_for!(result, "address.city");
/// ```
#[macro_export]
macro_rules! assert_failure_for {
    ($result:expr, $property:expr) => {
        match (&$result, $property) {
            (result, property) => {
                let result: &$crate::ValidationResult = result;
                if !result.has_failure_for(property) {
                    panic!(
                        "Expected a failure for `{}`, got failures for {:?}",
                        property,
                        result.to_dictionary().keys().collect::<::std::vec::Vec<_>>()
                    );
                }
            }
        }
    };
}

/// Assert that no failure was recorded for a property key.
///
/// # Example
///
/// ```rust
/// use ruleflow::{assert_no_failure_for, ValidationFailure, ValidationResult};
///
/// let result = ValidationResult::new(vec![ValidationFailure::new("name", "required")]);
/// assert_no_failure_for!(result, "email");
/// ```
#[macro_export]
macro_rules! assert_no_failure_for {
    ($result:expr, $property:expr) => {
        match (&$result, $property) {
            (result, property) => {
                let result: &$crate::ValidationResult = result;
                let messages: ::std::vec::Vec<&str> = result
                    .failures_for(property)
                    .map(|f| f.message.as_str())
                    .collect();
                if !messages.is_empty() {
                    panic!("Expected no failure for `{}`, got {:?}", property, messages);
                }
            }
        }
    };
}

/// Assert the exact messages recorded for a property key, in order.
///
/// # Example
///
/// ```rust
/// use ruleflow::{assert_messages, ValidationFailure, ValidationResult};
///
/// let result = ValidationResult::new(vec![
///     ValidationFailure::new("name", "'name' is required."),
///     ValidationFailure::new("name", "'name' is too short."),
/// ]);
/// assert_messages!(result, "name", ["'name' is required.", "'name' is too short."]);
/// ```
#[macro_export]
macro_rules! assert_messages {
    ($result:expr, $property:expr, [$($message:expr),* $(,)?]) => {
        match (&$result, $property) {
            (result, property) => {
                let result: &$crate::ValidationResult = result;
                let actual: ::std::vec::Vec<&str> = result
                    .failures_for(property)
                    .map(|f| f.message.as_str())
                    .collect();
                let expected: ::std::vec::Vec<&str> = ::std::vec![$($message),*];
                assert_eq!(actual, expected, "messages for `{}`", property);
            }
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
use crate::{options::CascadeMode, result::Severity};

#[cfg(feature = "proptest")]
impl Arbitrary for Severity {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Severity::Error),
            Just(Severity::Warning),
            Just(Severity::Info),
        ]
        .boxed()
    }
}

#[cfg(feature = "proptest")]
impl Arbitrary for CascadeMode {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![Just(CascadeMode::Continue), Just(CascadeMode::Stop)].boxed()
    }
}
