use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::ExecutionContext;
use crate::error::ValidationError;
use crate::result::ValidationFailure;
use crate::validator::Validator;
use crate::value::PropertyValue;

/// Rules applied to a property value as a whole object.
pub(crate) trait NestedRules<V>: Send + Sync {
    fn requires_async(&self) -> bool;

    fn run(
        &self,
        value: &V,
        key: &str,
        ctx: &ExecutionContext<'_>,
    ) -> Result<Vec<ValidationFailure>, ValidationError>;

    fn run_async<'a>(
        &'a self,
        value: &'a V,
        key: &'a str,
        ctx: &'a ExecutionContext<'a>,
    ) -> BoxFuture<'a, Vec<ValidationFailure>>;
}

/// A validator for `C` attached to a property whose present value is a `C`.
///
/// Failures are keyed below the parent property (`address.city`). A missing
/// value is skipped; pair the chain with `not_null` to require it.
pub(crate) struct ChildValidator<C> {
    validator: Arc<Validator<C>>,
}

impl<C> ChildValidator<C> {
    pub(crate) fn new(validator: Arc<Validator<C>>) -> Self {
        ChildValidator { validator }
    }
}

impl<C> fmt::Debug for ChildValidator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildValidator")
            .field("rules", &self.validator.len())
            .finish()
    }
}

impl<V, C> NestedRules<V> for ChildValidator<C>
where
    V: PropertyValue<Inner = C>,
    C: Send + Sync + 'static,
{
    fn requires_async(&self) -> bool {
        // nested runs only reach untagged chains
        self.validator
            .rules
            .iter()
            .any(|rule| rule.rule_sets().is_empty() && rule.requires_async())
    }

    fn run(
        &self,
        value: &V,
        key: &str,
        ctx: &ExecutionContext<'_>,
    ) -> Result<Vec<ValidationFailure>, ValidationError> {
        match value.present() {
            Some(inner) => {
                let nested = ctx.nested(key, self.validator.default_rule_cascade());
                self.validator.execute(inner, &nested)
            }
            None => Ok(Vec::new()),
        }
    }

    fn run_async<'a>(
        &'a self,
        value: &'a V,
        key: &'a str,
        ctx: &'a ExecutionContext<'a>,
    ) -> BoxFuture<'a, Vec<ValidationFailure>> {
        async move {
            match value.present() {
                Some(inner) => {
                    let nested = ctx.nested(key, self.validator.default_rule_cascade());
                    self.validator.execute_async(inner, &nested).await
                }
                None => Vec::new(),
            }
        }
        .boxed()
    }
}
