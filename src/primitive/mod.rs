//! Validation primitives
//!
//! A [`Primitive`] is one testable rule: a kind tag, a predicate over the
//! property value (and the whole object, for cross-field checks), the
//! placeholder values its message needs, and optional message, error code and
//! severity overrides.
//!
//! Every built-in shares this one shape, so the orchestration code never
//! branches on the kind. The kind only selects the default message template and
//! the default error code.
//!
//! # Example
//!
//! ```
//! use ruleflow::prelude::*;
//!
//! struct Signup {
//!     name: String,
//! }
//!
//! let validator = Validator::builder()
//!     .rule_for("name", |s: &Signup| s.name.clone())
//!     .rule(length(3, 5))
//!     .build();
//!
//! let result = validator.validate(&Signup { name: "Al".into() }).unwrap();
//! let failure = &result.failures()[0];
//! assert_eq!(failure.error_code, "length");
//! assert_eq!(
//!     failure.message,
//!     "'name' must be between 3 and 5 characters. You entered 2 characters."
//! );
//! ```

mod boolean;
mod comparison;
mod custom;
mod length;
mod pattern;
mod presence;

pub use boolean::{is_false, is_falsy, is_true, is_truthy};
pub use comparison::{
    equals, equals_property, exclusive_between, greater_than, greater_than_or_equals,
    greater_than_or_equals_property, greater_than_property, inclusive_between, less_than,
    less_than_or_equals, less_than_or_equals_property, less_than_property, not_equals,
    not_equals_property,
};
pub use custom::{must, must_async};
pub use length::{length, max_length, min_length};
pub use pattern::matches;
pub use presence::{empty, is_null, not_empty, not_null, required};

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::condition::Condition;
use crate::messages::{format_message, MessageTable};
use crate::result::{Severity, ValidationFailure};
use crate::value::PropertyValue;

/// The kind of a primitive.
///
/// Selects the default message template and supplies the default error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[allow(missing_docs)]
pub enum RuleKind {
    Equals,
    NotEquals,
    Required,
    NotNull,
    IsNull,
    Length,
    MinLength,
    MaxLength,
    Empty,
    NotEmpty,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    InclusiveBetween,
    ExclusiveBetween,
    IsTrue,
    IsFalse,
    IsTruthy,
    IsFalsy,
    Matches,
    Must,
    MustAsync,
}

impl RuleKind {
    /// Every kind, in declaration order.
    pub const ALL: [RuleKind; 23] = [
        RuleKind::Equals,
        RuleKind::NotEquals,
        RuleKind::Required,
        RuleKind::NotNull,
        RuleKind::IsNull,
        RuleKind::Length,
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::Empty,
        RuleKind::NotEmpty,
        RuleKind::GreaterThan,
        RuleKind::GreaterThanOrEquals,
        RuleKind::LessThan,
        RuleKind::LessThanOrEquals,
        RuleKind::InclusiveBetween,
        RuleKind::ExclusiveBetween,
        RuleKind::IsTrue,
        RuleKind::IsFalse,
        RuleKind::IsTruthy,
        RuleKind::IsFalsy,
        RuleKind::Matches,
        RuleKind::Must,
        RuleKind::MustAsync,
    ];

    /// The default error code, e.g. `greater_than_or_equals`.
    pub fn code(self) -> &'static str {
        match self {
            RuleKind::Equals => "equals",
            RuleKind::NotEquals => "not_equals",
            RuleKind::Required => "required",
            RuleKind::NotNull => "not_null",
            RuleKind::IsNull => "is_null",
            RuleKind::Length => "length",
            RuleKind::MinLength => "min_length",
            RuleKind::MaxLength => "max_length",
            RuleKind::Empty => "empty",
            RuleKind::NotEmpty => "not_empty",
            RuleKind::GreaterThan => "greater_than",
            RuleKind::GreaterThanOrEquals => "greater_than_or_equals",
            RuleKind::LessThan => "less_than",
            RuleKind::LessThanOrEquals => "less_than_or_equals",
            RuleKind::InclusiveBetween => "inclusive_between",
            RuleKind::ExclusiveBetween => "exclusive_between",
            RuleKind::IsTrue => "is_true",
            RuleKind::IsFalse => "is_false",
            RuleKind::IsTruthy => "is_truthy",
            RuleKind::IsFalsy => "is_falsy",
            RuleKind::Matches => "matches",
            RuleKind::Must => "must",
            RuleKind::MustAsync => "must_async",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Named values substituted into a failure message.
pub(crate) type Placeholders = Vec<(&'static str, String)>;

type SyncCheck<T, V> = Arc<dyn Fn(&V, &T) -> bool + Send + Sync>;
type AsyncCheck<T, V> = Arc<dyn for<'a> Fn(&'a V, &'a T) -> BoxFuture<'a, bool> + Send + Sync>;
type PlaceholderFn<T, V> = Arc<dyn Fn(&V, &T) -> Placeholders + Send + Sync>;
type MessageFn<T, V> = Arc<dyn Fn(&V, &T) -> String + Send + Sync>;

enum Check<T, V> {
    Sync(SyncCheck<T, V>),
    Async(AsyncCheck<T, V>),
}

impl<T, V> Clone for Check<T, V> {
    fn clone(&self) -> Self {
        match self {
            Check::Sync(f) => Check::Sync(Arc::clone(f)),
            Check::Async(f) => Check::Async(Arc::clone(f)),
        }
    }
}

pub(crate) enum Message<T, V> {
    Template(Cow<'static, str>),
    Producer(MessageFn<T, V>),
}

impl<T, V> Clone for Message<T, V> {
    fn clone(&self) -> Self {
        match self {
            Message::Template(template) => Message::Template(template.clone()),
            Message::Producer(f) => Message::Producer(Arc::clone(f)),
        }
    }
}

/// Message, error code and severity overrides for one primitive.
pub(crate) struct Overrides<T, V> {
    pub(crate) message: Option<Message<T, V>>,
    pub(crate) error_code: Option<Cow<'static, str>>,
    pub(crate) severity: Option<Severity>,
}

impl<T, V> Default for Overrides<T, V> {
    fn default() -> Self {
        Overrides {
            message: None,
            error_code: None,
            severity: None,
        }
    }
}

impl<T, V> Clone for Overrides<T, V> {
    fn clone(&self) -> Self {
        Overrides {
            message: self.message.clone(),
            error_code: self.error_code.clone(),
            severity: self.severity,
        }
    }
}

impl<T, V> Overrides<T, V> {
    #[cfg(feature = "tracing")]
    pub(crate) fn is_empty(&self) -> bool {
        self.message.is_none() && self.error_code.is_none() && self.severity.is_none()
    }

    /// Fields set in `other` replace ours.
    fn overlay(&mut self, other: Overrides<T, V>) {
        if other.message.is_some() {
            self.message = other.message;
        }
        if other.error_code.is_some() {
            self.error_code = other.error_code;
        }
        if other.severity.is_some() {
            self.severity = other.severity;
        }
    }
}

/// One validation rule for a value of type `V` on an object of type `T`.
///
/// Built with the factory functions in this module. A primitive is immutable
/// once it has been added to a rule chain.
pub struct Primitive<T, V> {
    kind: RuleKind,
    check: Check<T, V>,
    placeholders: Option<PlaceholderFn<T, V>>,
    overrides: Overrides<T, V>,
    conditions: Vec<Condition<T>>,
}

impl<T, V> Clone for Primitive<T, V> {
    fn clone(&self) -> Self {
        Primitive {
            kind: self.kind,
            check: self.check.clone(),
            placeholders: self.placeholders.clone(),
            overrides: self.overrides.clone(),
            conditions: self.conditions.clone(),
        }
    }
}

impl<T, V> fmt::Debug for Primitive<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive")
            .field("kind", &self.kind)
            .field("async", &matches!(self.check, Check::Async(_)))
            .field("error_code", &self.overrides.error_code)
            .field("severity", &self.overrides.severity)
            .field("conditions", &self.conditions)
            .finish_non_exhaustive()
    }
}

impl<T, V> Primitive<T, V> {
    pub(crate) fn new<F>(kind: RuleKind, predicate: F) -> Self
    where
        F: Fn(&V, &T) -> bool + Send + Sync + 'static,
    {
        Primitive {
            kind,
            check: Check::Sync(Arc::new(predicate)),
            placeholders: None,
            overrides: Overrides::default(),
            conditions: Vec::new(),
        }
    }

    pub(crate) fn new_async<F>(kind: RuleKind, predicate: F) -> Self
    where
        F: for<'a> Fn(&'a V, &'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
    {
        Primitive {
            kind,
            check: Check::Async(Arc::new(predicate)),
            placeholders: None,
            overrides: Overrides::default(),
            conditions: Vec::new(),
        }
    }

    pub(crate) fn with_placeholders<F>(mut self, placeholders: F) -> Self
    where
        F: Fn(&V, &T) -> Placeholders + Send + Sync + 'static,
    {
        self.placeholders = Some(Arc::new(placeholders));
        self
    }

    /// Replace the default message template.
    ///
    /// The template may use `{propertyName}`, `{propertyValue}` and whatever
    /// placeholders the primitive supplies.
    #[must_use]
    pub fn with_message(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.overrides.message = Some(Message::Template(template.into()));
        self
    }

    /// Build the message from the failing value and the object.
    ///
    /// The produced text is used as is; placeholders are not substituted.
    #[must_use]
    pub fn with_message_fn<F>(mut self, produce: F) -> Self
    where
        F: Fn(&V, &T) -> String + Send + Sync + 'static,
    {
        self.overrides.message = Some(Message::Producer(Arc::new(produce)));
        self
    }

    /// Replace the default error code.
    #[must_use]
    pub fn with_error_code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.overrides.error_code = Some(code.into());
        self
    }

    /// Set the severity of failures from this primitive.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.overrides.severity = Some(severity);
        self
    }

    /// Evaluate this primitive only when `predicate` holds for the object.
    ///
    /// Repeated guards must all hold.
    #[must_use]
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.conditions.push(Condition::when(predicate));
        self
    }

    /// Evaluate this primitive only when `predicate` does not hold.
    #[must_use]
    pub fn unless<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.conditions.push(Condition::unless(predicate));
        self
    }

    /// Asynchronous form of [`Primitive::when`].
    #[must_use]
    pub fn when_async<F>(mut self, predicate: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
    {
        self.conditions.push(Condition::when_async(predicate));
        self
    }

    /// Asynchronous form of [`Primitive::unless`].
    #[must_use]
    pub fn unless_async<F>(mut self, predicate: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
    {
        self.conditions.push(Condition::unless_async(predicate));
        self
    }

    /// The kind tag.
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Whether the predicate or the guard needs `validate_async`.
    pub fn is_async(&self) -> bool {
        matches!(self.check, Check::Async(_))
            || self.conditions.iter().any(Condition::is_async)
    }

    /// Apply builder-level overrides; they win over our own.
    pub(crate) fn apply_overrides(&mut self, pending: Overrides<T, V>) {
        self.overrides.overlay(pending);
    }

    /// Guards are ANDed in declaration order. `None` when an asynchronous
    /// guard is reached.
    pub(crate) fn applies_sync(&self, root: &T) -> Option<bool> {
        for condition in &self.conditions {
            if !condition.evaluate_sync(root)? {
                return Some(false);
            }
        }
        Some(true)
    }

    pub(crate) async fn applies(&self, root: &T) -> bool {
        for condition in &self.conditions {
            if !condition.evaluate(root).await {
                return false;
            }
        }
        true
    }

    /// `None` when the predicate is asynchronous.
    pub(crate) fn check_sync(&self, value: &V, root: &T) -> Option<bool> {
        match &self.check {
            Check::Sync(f) => Some(f(value, root)),
            Check::Async(_) => None,
        }
    }

    pub(crate) async fn check(&self, value: &V, root: &T) -> bool {
        match &self.check {
            Check::Sync(f) => f(value, root),
            Check::Async(f) => f(value, root).await,
        }
    }

    /// Build the failure record for `value` under `key`.
    ///
    /// `display` is the name substituted for `{propertyName}`.
    pub(crate) fn failure(
        &self,
        key: &str,
        display: &str,
        value: &V,
        root: &T,
        messages: &MessageTable,
    ) -> ValidationFailure
    where
        V: PropertyValue,
    {
        let attempted = value.attempted();
        let mut args: Placeholders = vec![
            ("propertyName", display.to_string()),
            ("propertyValue", attempted.to_string()),
        ];
        if let Some(extra) = &self.placeholders {
            args.extend(extra(value, root));
        }

        let message = match &self.overrides.message {
            Some(Message::Template(template)) => format_message(template, &args),
            Some(Message::Producer(produce)) => produce(value, root),
            None => format_message(messages.template(self.kind), &args),
        };
        let error_code = match &self.overrides.error_code {
            Some(code) => code.to_string(),
            None => self.kind.code().to_string(),
        };

        ValidationFailure {
            property_name: key.to_string(),
            message,
            attempted_value: attempted,
            error_code,
            severity: self.overrides.severity.unwrap_or_default(),
            placeholders: args
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::value::AttemptedValue;

    #[test]
    fn test_codes_are_snake_case() {
        assert_eq!(RuleKind::GreaterThanOrEquals.code(), "greater_than_or_equals");
        assert_eq!(RuleKind::MustAsync.to_string(), "must_async");
        for kind in RuleKind::ALL {
            assert!(kind.code().chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn test_failure_uses_default_template() {
        let failure = failure_for(&required::<(), String>(), "email", String::new());
        assert_eq!(failure.property_name, "email");
        assert_eq!(failure.message, "'email' is required.");
        assert_eq!(failure.error_code, "required");
        assert_eq!(failure.severity, Severity::Error);
        assert_eq!(failure.attempted_value, AttemptedValue::Text(String::new()));
        assert_eq!(failure.placeholders["propertyName"], "email");
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let primitive = greater_than::<(), i32>(10)
            .with_message("{propertyName} too small: {propertyValue} <= {comparisonValue}")
            .with_error_code("too_small")
            .with_severity(Severity::Warning);
        let failure = failure_for(&primitive, "qty", 3);

        assert_eq!(failure.message, "qty too small: 3 <= 10");
        assert_eq!(failure.error_code, "too_small");
        assert_eq!(failure.severity, Severity::Warning);
    }

    #[test]
    fn test_message_fn_output_is_final() {
        let primitive = less_than::<(), i32>(5)
            .with_message_fn(|value: &i32, _: &()| format!("{value} is not below five"));
        assert_eq!(failure_for(&primitive, "n", 9).message, "9 is not below five");

        let echo = not_empty::<(), String>()
            .with_message_fn(|value: &String, _: &()| format!("you typed {value}"));
        let failure = failure_for(&echo, "code", "{propertyName}".to_string());
        assert_eq!(failure.message, "you typed {propertyName}");
        assert_eq!(failure.placeholders["propertyName"], "code");
    }

    #[test]
    fn test_pending_overrides_win() {
        let mut primitive = not_empty::<(), String>()
            .with_error_code("own")
            .with_severity(Severity::Info);
        primitive.apply_overrides(Overrides {
            message: None,
            error_code: Some("pending".into()),
            severity: None,
        });
        let failure = failure_for(&primitive, "x", String::new());
        assert_eq!(failure.error_code, "pending");
        assert_eq!(failure.severity, Severity::Info);
    }

    #[test]
    fn test_guard_makes_primitive_async() {
        let primitive = required::<(), String>();
        assert!(!primitive.is_async());
        assert_eq!(primitive.applies_sync(&()), Some(true));

        let guarded = primitive.when_async(|_: &()| Box::pin(async { true }));
        assert!(guarded.is_async());
        assert_eq!(guarded.applies_sync(&()), None);
    }

    #[test]
    fn test_sync_unless_guard() {
        let primitive = required::<(), String>().unless(|_: &()| true);
        assert_eq!(primitive.applies_sync(&()), Some(false));
    }

    #[test]
    fn test_stacked_guards_all_hold() {
        let primitive = not_empty::<(bool, bool), String>()
            .when(|flags: &(bool, bool)| flags.0)
            .unless(|flags: &(bool, bool)| flags.1);
        assert_eq!(primitive.applies_sync(&(false, false)), Some(false));
        assert_eq!(primitive.applies_sync(&(true, true)), Some(false));
        assert_eq!(primitive.applies_sync(&(true, false)), Some(true));
        assert!(!primitive.is_async());

        let mixed = primitive.when_async(|_: &(bool, bool)| Box::pin(async { true }));
        assert!(mixed.is_async());
        assert_eq!(mixed.applies_sync(&(false, false)), Some(false));
        assert_eq!(mixed.applies_sync(&(true, false)), None);
    }

    #[test]
    fn test_debug_hides_closures() {
        let rendered = format!("{:?}", required::<(), String>());
        assert!(rendered.contains("Required"));
        assert!(rendered.starts_with("Primitive"));
    }
}
