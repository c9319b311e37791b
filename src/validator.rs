//! The validator: an immutable, reusable set of rule chains for one type
//!
//! A [`Validator`] is built once with [`Validator::builder`] and then invoked
//! any number of times. Invocation never mutates it, so one validator can be
//! shared behind an `Arc` and used from concurrent tasks without locking.
//!
//! Chains run in declaration order and their failures are concatenated in that
//! order. Within one run everything is sequential, including asynchronous
//! predicates.
//!
//! # Example
//!
//! ```
//! use ruleflow::prelude::*;
//!
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! let validator = Validator::builder()
//!     .rule_for("name", |u: &User| u.name.clone())
//!     .rule(not_empty())
//!     .rule(max_length(20))
//!     .rule_for("age", |u: &User| u.age)
//!     .rule(greater_than_or_equals(18))
//!     .build();
//!
//! let result = validator.validate(&User { name: String::new(), age: 12 }).unwrap();
//! assert!(!result.is_valid());
//! assert_eq!(result.to_dictionary().keys().collect::<Vec<_>>(), vec!["name", "age"]);
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::builder::ValidatorBuilder;
use crate::error::ValidationError;
use crate::messages::{self, MessageTable};
use crate::options::{CascadeMode, ValidationOptions};
use crate::result::{ValidationFailure, ValidationResult};
use crate::rule::{ExecutionContext, PropertyRule};
use crate::semigroup::Semigroup;

/// Rule chains for objects of type `T`.
pub struct Validator<T> {
    pub(crate) rules: Vec<Arc<dyn PropertyRule<T>>>,
    pub(crate) rule_cascade: CascadeMode,
    pub(crate) class_cascade: CascadeMode,
    pub(crate) messages: Option<Arc<MessageTable>>,
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Validator {
            rules: self.rules.clone(),
            rule_cascade: self.rule_cascade,
            class_cascade: self.class_cascade,
            messages: self.messages.clone(),
        }
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("properties", &self.rules.iter().map(|r| r.path()).collect::<Vec<_>>())
            .field("rule_cascade", &self.rule_cascade)
            .field("class_cascade", &self.class_cascade)
            .field("locale", &self.messages.as_ref().map(|m| m.locale().to_string()))
            .finish()
    }
}

impl<T> Validator<T> {
    /// Number of rule chains.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the validator has no rule chains.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Property paths of the chains, in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.path())
    }

    /// Whether any chain needs [`Validator::validate_async`].
    pub fn has_async_rules(&self) -> bool {
        self.rules.iter().any(|rule| rule.requires_async())
    }

    /// Cascade mode for chains that do not set their own.
    pub fn default_rule_cascade(&self) -> CascadeMode {
        self.rule_cascade
    }

    fn message_snapshot(&self) -> Arc<MessageTable> {
        match &self.messages {
            Some(table) => Arc::clone(table),
            None => messages::current(),
        }
    }

    fn selected<'s>(&'s self, ctx: &ExecutionContext<'_>) -> Vec<&'s Arc<dyn PropertyRule<T>>> {
        self.rules
            .iter()
            .filter(|rule| ctx.selects(rule.path(), rule.rule_sets()))
            .collect()
    }

    /// Run the selected chains synchronously.
    ///
    /// Every selected chain is checked for asynchronous parts before any of
    /// them runs.
    pub(crate) fn execute(
        &self,
        instance: &T,
        ctx: &ExecutionContext<'_>,
    ) -> Result<Vec<ValidationFailure>, ValidationError> {
        let selected = self.selected(ctx);
        if let Some(rule) = selected.iter().find(|rule| rule.requires_async()) {
            let property = ctx.key(rule.path());
            #[cfg(feature = "tracing")]
            tracing::warn!(
                property = %property,
                "asynchronous rules reached synchronous validation"
            );
            return Err(ValidationError::async_misuse(property));
        }

        let mut failures = Vec::new();
        for rule in selected {
            let recorded = rule.run(instance, ctx)?;
            let halt = self.class_cascade == CascadeMode::Stop && !recorded.is_empty();
            failures = failures.combine(recorded);
            if halt {
                break;
            }
        }
        Ok(failures)
    }

    pub(crate) async fn execute_async(
        &self,
        instance: &T,
        ctx: &ExecutionContext<'_>,
    ) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        for rule in self.selected(ctx) {
            let recorded = rule.run_async(instance, ctx).await;
            let halt = self.class_cascade == CascadeMode::Stop && !recorded.is_empty();
            failures = failures.combine(recorded);
            if halt {
                break;
            }
        }
        failures
    }
}

impl<T> Validator<T>
where
    T: Send + Sync + 'static,
{
    /// Start declaring a validator.
    pub fn builder() -> ValidatorBuilder<T> {
        ValidatorBuilder::new()
    }

    /// Validate with default options.
    ///
    /// Fails with [`ValidationError::AsyncRuleInSyncValidation`] when a selected
    /// chain has asynchronous predicates or conditions.
    pub fn validate(&self, instance: &T) -> Result<ValidationResult, ValidationError> {
        self.validate_with(instance, |_| {})
    }

    /// Validate with options adjusted by `configure`.
    ///
    /// ```
    /// use ruleflow::prelude::*;
    ///
    /// struct Login {
    ///     user: String,
    ///     password: String,
    /// }
    ///
    /// let validator = Validator::builder()
    ///     .rule_for("user", |l: &Login| l.user.clone())
    ///     .rule(required())
    ///     .rule_for("password", |l: &Login| l.password.clone())
    ///     .rule(min_length(8))
    ///     .build();
    ///
    /// let login = Login { user: String::new(), password: "short".into() };
    /// let result = validator
    ///     .validate_with(&login, |o| {
    ///         o.include_property("password");
    ///     })
    ///     .unwrap();
    /// assert_eq!(result.len(), 1);
    /// assert!(result.has_failure_for("password"));
    /// ```
    pub fn validate_with<F>(
        &self,
        instance: &T,
        configure: F,
    ) -> Result<ValidationResult, ValidationError>
    where
        F: FnOnce(&mut ValidationOptions),
    {
        let options = ValidationOptions::configured(configure);
        let messages = self.message_snapshot();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            chains = self.rules.len(),
            rule_sets = ?options.rule_sets,
            "validation started"
        );

        let ctx = ExecutionContext::root(&options, &messages, self.rule_cascade);
        let failures = self.execute(instance, &ctx)?;
        Ok(finish(failures, &options))
    }

    /// Validate with default options, awaiting asynchronous rules.
    pub fn validate_async<'a>(
        &'a self,
        instance: &'a T,
    ) -> impl Future<Output = ValidationResult> + Send + 'a {
        self.validate_async_with(instance, |_| {})
    }

    /// Asynchronous form of [`Validator::validate_with`].
    ///
    /// Options and the message table are captured when this is called, not
    /// when the future is first polled.
    pub fn validate_async_with<'a, F>(
        &'a self,
        instance: &'a T,
        configure: F,
    ) -> impl Future<Output = ValidationResult> + Send + 'a
    where
        F: FnOnce(&mut ValidationOptions),
    {
        let options = ValidationOptions::configured(configure);
        let messages = self.message_snapshot();
        async move {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                chains = self.rules.len(),
                rule_sets = ?options.rule_sets,
                "async validation started"
            );

            let ctx = ExecutionContext::root(&options, &messages, self.rule_cascade);
            let failures = self.execute_async(instance, &ctx).await;
            finish(failures, &options)
        }
    }

    /// `Err(ValidationError::Invalid)` when the object has blocking failures.
    ///
    /// ```
    /// use ruleflow::prelude::*;
    ///
    /// struct Item {
    ///     sku: String,
    /// }
    ///
    /// let validator = Validator::builder()
    ///     .rule_for("sku", |i: &Item| i.sku.clone())
    ///     .rule(not_empty())
    ///     .build();
    ///
    /// let err = validator.ensure_valid(&Item { sku: String::new() }).unwrap_err();
    /// assert!(matches!(err, ValidationError::Invalid(_)));
    /// assert_eq!(err.result().map(|r| r.len()), Some(1));
    /// ```
    pub fn ensure_valid(&self, instance: &T) -> Result<(), ValidationError> {
        self.validate(instance)?
            .into_result()
            .map_err(ValidationError::Invalid)
    }

    /// Asynchronous form of [`Validator::ensure_valid`].
    pub async fn ensure_valid_async(&self, instance: &T) -> Result<(), ValidationError> {
        self.validate_async(instance)
            .await
            .into_result()
            .map_err(ValidationError::Invalid)
    }
}

fn finish(failures: Vec<ValidationFailure>, options: &ValidationOptions) -> ValidationResult {
    let result = ValidationResult::new(failures).with_rule_sets(options.executed_rule_sets());
    #[cfg(feature = "tracing")]
    tracing::debug!(failures = result.len(), valid = result.is_valid(), "validation finished");
    result
}
