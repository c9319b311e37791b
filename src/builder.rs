//! Fluent construction of validators
//!
//! [`ValidatorBuilder`] collects rule chains; [`RuleBuilder`] appends primitives
//! to the chain opened by the last `rule_for`. Calling `rule_for` again (or
//! `build`) closes the current chain. Chains are frozen once the validator is
//! built.
//!
//! Overrides set on the [`RuleBuilder`] itself (`with_message`, `with_severity`,
//! `with_error_code`, `with_message_fn`) are held as *pending* and attached to
//! the next primitive added with [`RuleBuilder::rule`]. They never rewrite
//! primitives added earlier.
//!
//! ```
//! use ruleflow::prelude::*;
//!
//! struct Profile {
//!     bio: String,
//! }
//!
//! let validator = Validator::builder()
//!     .rule_for("bio", |p: &Profile| p.bio.clone())
//!     .rule(not_empty())
//!     .with_severity(Severity::Warning)
//!     .with_message("A longer bio helps people find you.")
//!     .rule(min_length(20))
//!     .build();
//!
//! let result = validator.validate(&Profile { bio: "hi".into() }).unwrap();
//! assert!(result.is_valid());
//! assert_eq!(result.warnings().count(), 1);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::condition::Condition;
use crate::messages::MessageTable;
use crate::options::CascadeMode;
use crate::primitive::{self, Message, Overrides, Primitive};
use crate::result::Severity;
use crate::rule::{ChildValidator, Component, NestedRules, PropertyRule, RuleChain, Selector};
use crate::validator::Validator;
use crate::value::PropertyValue;

/// Builder for a [`Validator`].
pub struct ValidatorBuilder<T> {
    rules: Vec<Arc<dyn PropertyRule<T>>>,
    rule_cascade: CascadeMode,
    class_cascade: CascadeMode,
    messages: Option<Arc<MessageTable>>,
    rule_sets: Vec<String>,
    conditions: Vec<Condition<T>>,
}

impl<T> fmt::Debug for ValidatorBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorBuilder")
            .field("chains", &self.rules.len())
            .field("rule_cascade", &self.rule_cascade)
            .field("class_cascade", &self.class_cascade)
            .field("rule_sets", &self.rule_sets)
            .finish_non_exhaustive()
    }
}

impl<T> Default for ValidatorBuilder<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ValidatorBuilder<T>
where
    T: Send + Sync + 'static,
{
    /// An empty builder.
    pub fn new() -> Self {
        ValidatorBuilder {
            rules: Vec::new(),
            rule_cascade: CascadeMode::Continue,
            class_cascade: CascadeMode::Continue,
            messages: None,
            rule_sets: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// Open a chain for the property at `path`.
    ///
    /// `path` is the failure key; it is also the display name unless
    /// [`RuleBuilder::with_name`] sets one.
    pub fn rule_for<V, F>(self, path: impl Into<String>, selector: F) -> RuleBuilder<T, V>
    where
        V: PropertyValue + 'static,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let chain = RuleChain::new(
            path.into(),
            Selector::Single(Arc::new(selector)),
            self.rule_sets.clone(),
            self.conditions.clone(),
        );
        RuleBuilder::new(self, chain)
    }

    /// Open a chain applied to every element of a collection.
    ///
    /// Failures are keyed `path[index]`.
    ///
    /// ```
    /// use ruleflow::prelude::*;
    ///
    /// struct Post {
    ///     tags: Vec<String>,
    /// }
    ///
    /// let validator = Validator::builder()
    ///     .rule_for_each("tags", |p: &Post| p.tags.clone())
    ///     .rule(max_length(5))
    ///     .build();
    ///
    /// let post = Post { tags: vec!["rust".into(), "validation".into()] };
    /// let result = validator.validate(&post).unwrap();
    /// assert!(result.has_failure_for("tags[1]"));
    /// ```
    pub fn rule_for_each<V, I, F>(self, path: impl Into<String>, selector: F) -> RuleBuilder<T, V>
    where
        V: PropertyValue + 'static,
        I: IntoIterator<Item = V>,
        F: Fn(&T) -> I + Send + Sync + 'static,
    {
        let chain = RuleChain::new(
            path.into(),
            Selector::Each(Arc::new(move |instance: &T| {
                selector(instance).into_iter().collect::<Vec<V>>()
            })),
            self.rule_sets.clone(),
            self.conditions.clone(),
        );
        RuleBuilder::new(self, chain)
    }

    /// Default cascade mode for chains that do not set one.
    #[must_use]
    pub fn rule_cascade(mut self, mode: CascadeMode) -> Self {
        self.rule_cascade = mode;
        self
    }

    /// With [`CascadeMode::Stop`], no further chains run once a chain has
    /// recorded a failure.
    #[must_use]
    pub fn class_cascade(mut self, mode: CascadeMode) -> Self {
        self.class_cascade = mode;
        self
    }

    /// Use this table instead of the process-wide locale.
    #[must_use]
    pub fn messages(mut self, table: MessageTable) -> Self {
        self.messages = Some(Arc::new(table));
        self
    }

    /// Declare chains that only run when the rule set `name` is selected.
    ///
    /// ```
    /// use ruleflow::prelude::*;
    ///
    /// struct Account {
    ///     id: u64,
    ///     name: String,
    /// }
    ///
    /// let validator = Validator::builder()
    ///     .rule_for("name", |a: &Account| a.name.clone())
    ///     .rule(not_empty())
    ///     .rule_set("update", |b| {
    ///         b.rule_for("id", |a: &Account| a.id).rule(greater_than(0))
    ///     })
    ///     .build();
    ///
    /// let account = Account { id: 0, name: String::new() };
    /// assert_eq!(validator.validate(&account).unwrap().len(), 1);
    /// let update = validator.validate_with(&account, |o| { o.rule_set("update"); }).unwrap();
    /// assert_eq!(update.len(), 1);
    /// assert!(update.has_failure_for("id"));
    /// ```
    pub fn rule_set<B, F>(mut self, name: impl Into<String>, define: F) -> Self
    where
        F: FnOnce(Self) -> B,
        B: Into<ValidatorBuilder<T>>,
    {
        self.rule_sets.push(name.into());
        let mut builder: Self = define(self).into();
        builder.rule_sets.pop();
        builder
    }

    /// Declare chains that only run when `predicate` holds.
    pub fn when<P, B, F>(self, predicate: P, define: F) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        F: FnOnce(Self) -> B,
        B: Into<ValidatorBuilder<T>>,
    {
        self.scoped(Condition::when(predicate), define)
    }

    /// Declare chains that only run when `predicate` does not hold.
    pub fn unless<P, B, F>(self, predicate: P, define: F) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        F: FnOnce(Self) -> B,
        B: Into<ValidatorBuilder<T>>,
    {
        self.scoped(Condition::unless(predicate), define)
    }

    /// Asynchronous form of [`ValidatorBuilder::when`].
    pub fn when_async<P, B, F>(self, predicate: P, define: F) -> Self
    where
        P: for<'a> Fn(&'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
        F: FnOnce(Self) -> B,
        B: Into<ValidatorBuilder<T>>,
    {
        self.scoped(Condition::when_async(predicate), define)
    }

    /// Asynchronous form of [`ValidatorBuilder::unless`].
    pub fn unless_async<P, B, F>(self, predicate: P, define: F) -> Self
    where
        P: for<'a> Fn(&'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
        F: FnOnce(Self) -> B,
        B: Into<ValidatorBuilder<T>>,
    {
        self.scoped(Condition::unless_async(predicate), define)
    }

    fn scoped<B, F>(mut self, condition: Condition<T>, define: F) -> Self
    where
        F: FnOnce(Self) -> B,
        B: Into<ValidatorBuilder<T>>,
    {
        self.conditions.push(condition);
        let mut builder: Self = define(self).into();
        builder.conditions.pop();
        builder
    }

    /// Append every chain of `other`, keeping their rule sets.
    #[must_use]
    pub fn include(mut self, other: &Validator<T>) -> Self {
        self.rules.extend(other.rules.iter().cloned());
        self
    }

    /// Freeze the chains into a validator.
    pub fn build(self) -> Validator<T> {
        Validator {
            rules: self.rules,
            rule_cascade: self.rule_cascade,
            class_cascade: self.class_cascade,
            messages: self.messages,
        }
    }
}

/// Builder for one rule chain; returned by [`ValidatorBuilder::rule_for`].
pub struct RuleBuilder<T, V> {
    parent: ValidatorBuilder<T>,
    chain: RuleChain<T, V>,
    pending: Overrides<T, V>,
}

impl<T, V> fmt::Debug for RuleBuilder<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleBuilder")
            .field("property", &self.chain.path)
            .field("rules", &self.chain.components.len())
            .finish_non_exhaustive()
    }
}

impl<T, V> RuleBuilder<T, V>
where
    T: Send + Sync + 'static,
    V: PropertyValue + 'static,
{
    fn new(parent: ValidatorBuilder<T>, chain: RuleChain<T, V>) -> Self {
        RuleBuilder {
            parent,
            chain,
            pending: Overrides::default(),
        }
    }

    /// Append a primitive. Pending overrides attach to it.
    #[must_use]
    pub fn rule(mut self, primitive: Primitive<T, V>) -> Self {
        let mut primitive = primitive;
        primitive.apply_overrides(std::mem::take(&mut self.pending));
        self.chain.components.push(Component::Check(primitive));
        self
    }

    /// Append several primitives in order.
    #[must_use]
    pub fn rules<I>(self, primitives: I) -> Self
    where
        I: IntoIterator<Item = Primitive<T, V>>,
    {
        primitives.into_iter().fold(self, RuleBuilder::rule)
    }

    /// Shorthand for `.rule(must(predicate))`.
    #[must_use]
    pub fn must<F>(self, predicate: F) -> Self
    where
        F: Fn(&V, &T) -> bool + Send + Sync + 'static,
    {
        self.rule(primitive::must(predicate))
    }

    /// Shorthand for `.rule(must_async(predicate))`.
    #[must_use]
    pub fn must_async<F>(self, predicate: F) -> Self
    where
        F: for<'a> Fn(&'a V, &'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
    {
        self.rule(primitive::must_async(predicate))
    }

    /// Validate the present value with another validator.
    ///
    /// Nested failures are keyed below this property (`address.city`). A
    /// missing value is skipped. Pending overrides do not apply to nested
    /// failures and are discarded.
    ///
    /// ```
    /// use ruleflow::prelude::*;
    /// use ruleflow::property_value;
    ///
    /// #[derive(Debug, Clone)]
    /// struct Address {
    ///     city: String,
    /// }
    /// property_value!(Address);
    ///
    /// struct Customer {
    ///     address: Option<Address>,
    /// }
    ///
    /// let address = Validator::builder()
    ///     .rule_for("city", |a: &Address| a.city.clone())
    ///     .rule(not_empty())
    ///     .build();
    ///
    /// let customer = Validator::builder()
    ///     .rule_for("address", |c: &Customer| c.address.clone())
    ///     .set_validator(address)
    ///     .build();
    ///
    /// let result = customer
    ///     .validate(&Customer { address: Some(Address { city: String::new() }) })
    ///     .unwrap();
    /// assert!(result.has_failure_for("address.city"));
    /// assert!(customer.validate(&Customer { address: None }).unwrap().is_valid());
    /// ```
    #[must_use]
    pub fn set_validator<C>(mut self, validator: impl Into<Arc<Validator<C>>>) -> Self
    where
        V: PropertyValue<Inner = C>,
        C: Send + Sync + 'static,
    {
        #[cfg(feature = "tracing")]
        {
            if !self.pending.is_empty() {
                tracing::warn!(
                    property = %self.chain.path,
                    "override set before a nested validator was dropped"
                );
            }
        }
        self.pending = Overrides::default();
        let child: Arc<dyn NestedRules<V>> = Arc::new(ChildValidator::new(validator.into()));
        self.chain.components.push(Component::Child(child));
        self
    }

    /// Message template for the next primitive added.
    #[must_use]
    pub fn with_message(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.pending.message = Some(Message::Template(template.into()));
        self
    }

    /// Message producer for the next primitive added.
    ///
    /// The produced text is the final message; placeholders are not substituted.
    #[must_use]
    pub fn with_message_fn<F>(mut self, produce: F) -> Self
    where
        F: Fn(&V, &T) -> String + Send + Sync + 'static,
    {
        self.pending.message = Some(Message::Producer(Arc::new(produce)));
        self
    }

    /// Error code for the next primitive added.
    #[must_use]
    pub fn with_error_code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.pending.error_code = Some(code.into());
        self
    }

    /// Severity for the next primitive added.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.pending.severity = Some(severity);
        self
    }

    /// Name substituted for `{propertyName}`; the failure key is unchanged.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.chain.display_name = Some(name.into());
        self
    }

    /// Replace the failure key (and default display name) of this chain.
    #[must_use]
    pub fn override_property_name(mut self, key: impl Into<String>) -> Self {
        self.chain.path = key.into();
        self
    }

    /// Cascade mode for this chain.
    #[must_use]
    pub fn cascade(mut self, mode: CascadeMode) -> Self {
        self.chain.cascade = Some(mode);
        self
    }

    /// Run the whole chain only when `predicate` holds.
    #[must_use]
    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.chain.conditions.push(Condition::when(predicate));
        self
    }

    /// Run the whole chain only when `predicate` does not hold.
    #[must_use]
    pub fn unless<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.chain.conditions.push(Condition::unless(predicate));
        self
    }

    /// Asynchronous form of [`RuleBuilder::when`].
    #[must_use]
    pub fn when_async<P>(mut self, predicate: P) -> Self
    where
        P: for<'a> Fn(&'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
    {
        self.chain.conditions.push(Condition::when_async(predicate));
        self
    }

    /// Asynchronous form of [`RuleBuilder::unless`].
    #[must_use]
    pub fn unless_async<P>(mut self, predicate: P) -> Self
    where
        P: for<'a> Fn(&'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
    {
        self.chain.conditions.push(Condition::unless_async(predicate));
        self
    }

    /// Close this chain and open one for another property.
    pub fn rule_for<W, F>(self, path: impl Into<String>, selector: F) -> RuleBuilder<T, W>
    where
        W: PropertyValue + 'static,
        F: Fn(&T) -> W + Send + Sync + 'static,
    {
        self.end().rule_for(path, selector)
    }

    /// Close this chain and open one over a collection.
    pub fn rule_for_each<W, I, F>(self, path: impl Into<String>, selector: F) -> RuleBuilder<T, W>
    where
        W: PropertyValue + 'static,
        I: IntoIterator<Item = W>,
        F: Fn(&T) -> I + Send + Sync + 'static,
    {
        self.end().rule_for_each(path, selector)
    }

    /// Close this chain and declare a rule set.
    pub fn rule_set<B, F>(self, name: impl Into<String>, define: F) -> ValidatorBuilder<T>
    where
        F: FnOnce(ValidatorBuilder<T>) -> B,
        B: Into<ValidatorBuilder<T>>,
    {
        self.end().rule_set(name, define)
    }

    /// Close this chain.
    pub fn end(self) -> ValidatorBuilder<T> {
        #[cfg(feature = "tracing")]
        {
            if !self.pending.is_empty() {
                tracing::warn!(
                    property = %self.chain.path,
                    "override set after the last rule of the chain was dropped"
                );
            }
        }
        let RuleBuilder {
            mut parent, chain, ..
        } = self;
        parent.rules.push(Arc::new(chain));
        parent
    }

    /// Close this chain and build the validator.
    pub fn build(self) -> Validator<T> {
        self.end().build()
    }
}

impl<T, V> From<RuleBuilder<T, V>> for ValidatorBuilder<T>
where
    T: Send + Sync + 'static,
    V: PropertyValue + 'static,
{
    fn from(builder: RuleBuilder<T, V>) -> Self {
        builder.end()
    }
}
