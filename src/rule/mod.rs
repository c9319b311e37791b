//! Rule chains and their execution
//!
//! A validator owns an ordered list of type-erased [`PropertyRule`]s. The only
//! implementation is [`RuleChain`], which binds one property selector to an
//! ordered list of primitives and nested validators.
//!
//! Execution is strictly sequential. The synchronous path answers `None` from
//! every asynchronous predicate or guard and turns that into
//! [`ValidationError::AsyncRuleInSyncValidation`]; the asynchronous path awaits
//! each one in declaration order.

mod chain;
mod child;

pub(crate) use chain::{Component, RuleChain, Selector};
pub(crate) use child::{ChildValidator, NestedRules};

use futures::future::BoxFuture;

use crate::error::ValidationError;
use crate::messages::MessageTable;
use crate::options::{CascadeMode, ValidationOptions};
use crate::result::ValidationFailure;

/// A type-erased rule chain over objects of type `T`.
pub(crate) trait PropertyRule<T>: Send + Sync {
    /// Property path relative to the validator that owns the rule.
    fn path(&self) -> &str;

    /// Rule sets the rule was declared in; empty when declared outside any.
    fn rule_sets(&self) -> &[String];

    /// Whether any guard, primitive or nested validator is asynchronous.
    fn requires_async(&self) -> bool;

    fn run(
        &self,
        instance: &T,
        ctx: &ExecutionContext<'_>,
    ) -> Result<Vec<ValidationFailure>, ValidationError>;

    fn run_async<'a>(
        &'a self,
        instance: &'a T,
        ctx: &'a ExecutionContext<'a>,
    ) -> BoxFuture<'a, Vec<ValidationFailure>>;
}

/// Read-only state shared by every chain in one validation run.
#[derive(Debug)]
pub(crate) struct ExecutionContext<'a> {
    pub(crate) options: &'a ValidationOptions,
    pub(crate) messages: &'a MessageTable,
    rule_cascade: CascadeMode,
    prefix: Option<String>,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn root(
        options: &'a ValidationOptions,
        messages: &'a MessageTable,
        rule_cascade: CascadeMode,
    ) -> Self {
        ExecutionContext {
            options,
            messages,
            rule_cascade,
            prefix: None,
        }
    }

    /// Context for a nested validator running under the property `key`.
    pub(crate) fn nested(&self, key: &str, rule_cascade: CascadeMode) -> ExecutionContext<'a> {
        ExecutionContext {
            options: self.options,
            messages: self.messages,
            rule_cascade,
            prefix: Some(key.to_string()),
        }
    }

    /// Full property key of `path`, e.g. `address.city`.
    pub(crate) fn key(&self, path: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}.{path}"),
            None => path.to_string(),
        }
    }

    /// Run override, then the chain's own mode, then the validator default.
    pub(crate) fn cascade_for(&self, chain: Option<CascadeMode>) -> CascadeMode {
        self.options
            .property_cascade_mode
            .or(chain)
            .unwrap_or(self.rule_cascade)
    }

    /// Whether a rule declared at `path` in `rule_sets` takes part in this run.
    ///
    /// Nested validators always run their rules declared outside any rule set.
    pub(crate) fn selects(&self, path: &str, rule_sets: &[String]) -> bool {
        let key = self.key(path);
        let in_scope = self.options.includes(&key) || self.options.leads_to(&key);
        let in_set = match self.prefix {
            Some(_) => rule_sets.is_empty(),
            None => self.options.selects_rule_sets(rule_sets),
        };
        in_scope && in_set
    }
}
