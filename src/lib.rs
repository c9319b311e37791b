//! # Ruleflow
//!
//! Fluent, declarative validation rules for Rust.
//!
//! A [`Validator`] is an ordered list of rule chains. Each chain binds one
//! property of the target type to an ordered list of primitives (`required`,
//! `length`, `greater_than`, `must`, ...), with per-rule message, error code and
//! severity overrides, conditions and a cascade policy. Validation returns a
//! [`ValidationResult`]: invalid objects are data, not errors.
//!
//! ## Quick Example
//!
//! ```rust
//! use ruleflow::prelude::*;
//!
//! struct User {
//!     name: String,
//!     email: String,
//!     age: u32,
//! }
//!
//! let validator = Validator::builder()
//!     .rule_for("name", |u: &User| u.name.clone())
//!     .rule(required())
//!     .rule(length(2, 40))
//!     .rule_for("email", |u: &User| u.email.clone())
//!     .with_message("'{propertyName}' must be an email address.")
//!     .rule(must(|email: &String, _: &User| email.contains('@')))
//!     .rule_for("age", |u: &User| u.age)
//!     .rule(inclusive_between(18, 130))
//!     .build();
//!
//! let user = User { name: "A".into(), email: "nope".into(), age: 17 };
//! let result = validator.validate(&user).unwrap();
//!
//! assert!(!result.is_valid());
//! assert_eq!(
//!     result.to_dictionary()["name"],
//!     vec!["'name' must be between 2 and 40 characters. You entered 1 characters."]
//! );
//! assert_eq!(result.failures()[1].message, "'email' must be an email address.");
//! ```
//!
//! ## Asynchronous rules
//!
//! `must_async` and the `*_async` conditions take predicates returning a
//! [`BoxFuture`](futures::future::BoxFuture). Validators holding them must be run
//! with [`Validator::validate_async`]; the synchronous entry point reports
//! [`ValidationError::AsyncRuleInSyncValidation`] before evaluating anything.
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events for validation runs, skipped chains and
//!   dropped overrides.
//! - `serde`: `Serialize`/`Deserialize` for results, failures and options.
//! - `proptest`: `Arbitrary` implementations for [`Severity`] and [`CascadeMode`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod builder;
pub mod condition;
pub mod error;
pub mod messages;
pub mod options;
pub mod primitive;
pub mod result;
mod rule;
pub mod semigroup;
pub mod testing;
pub mod validator;
pub mod value;

// Re-exports
pub use builder::{RuleBuilder, ValidatorBuilder};
pub use condition::Condition;
pub use error::ValidationError;
pub use messages::MessageTable;
pub use options::{CascadeMode, ValidationOptions};
pub use primitive::{Primitive, RuleKind};
pub use result::{Severity, ValidationFailure, ValidationResult};
pub use semigroup::Semigroup;
pub use validator::Validator;
pub use value::{AttemptedValue, PropertyValue};

/// Prelude module for convenient imports
///
/// Brings the validator types and every primitive factory into scope.
pub mod prelude {
    pub use crate::builder::{RuleBuilder, ValidatorBuilder};
    pub use crate::error::ValidationError;
    pub use crate::messages::MessageTable;
    pub use crate::options::{CascadeMode, ValidationOptions};
    pub use crate::primitive::{
        empty, equals, equals_property, exclusive_between, greater_than,
        greater_than_or_equals, greater_than_or_equals_property, greater_than_property,
        inclusive_between, is_false, is_falsy, is_null, is_true, is_truthy, length, less_than,
        less_than_or_equals, less_than_or_equals_property, less_than_property, matches,
        max_length, min_length, must, must_async, not_empty, not_equals, not_equals_property,
        not_null, required, Primitive, RuleKind,
    };
    pub use crate::result::{Severity, ValidationFailure, ValidationResult};
    pub use crate::semigroup::Semigroup;
    pub use crate::validator::Validator;
    pub use crate::value::PropertyValue;
}
