//! Validation results
//!
//! A [`ValidationResult`] is produced fresh by every `validate` call. It owns an
//! ordered list of [`ValidationFailure`]s (chain declaration order, then
//! primitive declaration order) and derives everything else from that list.
//! Validity is never stored: [`ValidationResult::is_valid`] is computed from the
//! failures' severities on every call.
//!
//! # Examples
//!
//! ```
//! use ruleflow::{Severity, ValidationFailure, ValidationResult};
//!
//! let result = ValidationResult::new(vec![
//!     ValidationFailure::new("name", "'name' must not be empty."),
//!     ValidationFailure::new("age", "'age' looks unusual.").with_severity(Severity::Warning),
//! ]);
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.errors().count(), 1);
//! assert_eq!(result.warnings().count(), 1);
//!
//! let dict = result.to_dictionary();
//! assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["name", "age"]);
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::value::AttemptedValue;

/// How serious a failure is.
///
/// Only [`Severity::Error`] makes a result invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Blocks validity.
    #[default]
    Error,
    /// Reported, but the object is still valid.
    Warning,
    /// Informational only.
    Info,
}

impl Severity {
    /// Whether a failure with this severity makes the result invalid.
    #[inline]
    pub fn is_blocking(self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(name)
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationFailure {
    /// Key of the property that failed (`address.city`, `tags[2]`).
    pub property_name: String,
    /// Message with every known placeholder substituted.
    pub message: String,
    /// The value the rule was evaluated against.
    pub attempted_value: AttemptedValue,
    /// Custom code, or the snake_case kind of the failing rule.
    pub error_code: String,
    /// Severity of the failure.
    pub severity: Severity,
    /// Placeholder values that were available to the message template.
    pub placeholders: IndexMap<String, String>,
}

impl ValidationFailure {
    /// Create an error-severity failure with no code and a null attempted value.
    pub fn new(property_name: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationFailure {
            property_name: property_name.into(),
            message: message.into(),
            attempted_value: AttemptedValue::Null,
            error_code: String::new(),
            severity: Severity::Error,
            placeholders: IndexMap::new(),
        }
    }

    /// Set the error code.
    #[must_use]
    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = code.into();
        self
    }

    /// Set the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the attempted value.
    #[must_use]
    pub fn with_attempted_value(mut self, value: AttemptedValue) -> Self {
        self.attempted_value = value;
        self
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationResult {
    failures: Vec<ValidationFailure>,
    rule_sets_executed: Vec<String>,
}

impl ValidationResult {
    /// Create a result from an ordered list of failures.
    pub fn new(failures: Vec<ValidationFailure>) -> Self {
        ValidationResult {
            failures,
            rule_sets_executed: Vec::new(),
        }
    }

    /// A result without failures.
    pub fn valid() -> Self {
        Self::default()
    }

    pub(crate) fn with_rule_sets(mut self, rule_sets: Vec<String>) -> Self {
        self.rule_sets_executed = rule_sets;
        self
    }

    /// `true` when no failure has [`Severity::Error`].
    ///
    /// ```
    /// use ruleflow::{Severity, ValidationFailure, ValidationResult};
    ///
    /// let warnings_only = ValidationResult::new(vec![
    ///     ValidationFailure::new("nickname", "too long").with_severity(Severity::Warning),
    /// ]);
    /// assert!(warnings_only.is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        !self.failures.iter().any(|f| f.severity.is_blocking())
    }

    /// All failures in the order they were recorded.
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Iterate over all failures.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationFailure> {
        self.failures.iter()
    }

    /// Consume the result, returning its failures.
    pub fn into_failures(self) -> Vec<ValidationFailure> {
        self.failures
    }

    /// Number of failures of any severity.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Whether no failure of any severity was recorded.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures that block validity.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.failures.iter().filter(|f| f.severity.is_blocking())
    }

    /// Failures that do not block validity.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.failures.iter().filter(|f| !f.severity.is_blocking())
    }

    /// Failures recorded for one property key.
    pub fn failures_for<'a>(
        &'a self,
        property: &'a str,
    ) -> impl Iterator<Item = &'a ValidationFailure> + 'a {
        self.failures
            .iter()
            .filter(move |f| f.property_name == property)
    }

    /// Whether any failure was recorded for the property key.
    pub fn has_failure_for(&self, property: &str) -> bool {
        self.failures_for(property).next().is_some()
    }

    /// Property key to messages, both in recording order.
    pub fn to_dictionary(&self) -> IndexMap<String, Vec<String>> {
        let mut dict: IndexMap<String, Vec<String>> = IndexMap::new();
        for failure in &self.failures {
            dict.entry(failure.property_name.clone())
                .or_default()
                .push(failure.message.clone());
        }
        dict
    }

    /// Error code to message for one property; the first message per code wins.
    ///
    /// This is the shape form integrations key their error objects by.
    ///
    /// ```
    /// use ruleflow::{ValidationFailure, ValidationResult};
    ///
    /// let result = ValidationResult::new(vec![
    ///     ValidationFailure::new("email", "required").with_error_code("required"),
    ///     ValidationFailure::new("email", "bad format").with_error_code("matches"),
    /// ]);
    /// let errors = result.errors_by_code("email");
    /// assert_eq!(errors.get("matches").map(String::as_str), Some("bad format"));
    /// ```
    pub fn errors_by_code(&self, property: &str) -> IndexMap<String, String> {
        let mut codes = IndexMap::new();
        for failure in self.failures_for(property) {
            codes
                .entry(failure.error_code.clone())
                .or_insert_with(|| failure.message.clone());
        }
        codes
    }

    /// Names of the rule sets selected for the run that produced this result.
    pub fn rule_sets_executed(&self) -> &[String] {
        &self.rule_sets_executed
    }

    /// Join all messages with `separator`.
    pub fn to_string_with(&self, separator: &str) -> String {
        self.failures
            .iter()
            .map(|f| f.message.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// `Ok(())` when valid, otherwise the result itself as the error.
    pub fn into_result(self) -> Result<(), ValidationResult> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with("\n"))
    }
}

impl<'a> IntoIterator for &'a ValidationResult {
    type Item = &'a ValidationFailure;
    type IntoIter = std::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

impl From<Vec<ValidationFailure>> for ValidationResult {
    fn from(failures: Vec<ValidationFailure>) -> Self {
        ValidationResult::new(failures)
    }
}
