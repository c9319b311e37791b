use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::{ExecutionContext, NestedRules, PropertyRule};
use crate::condition::Condition;
use crate::error::ValidationError;
use crate::options::CascadeMode;
use crate::primitive::Primitive;
use crate::result::ValidationFailure;
use crate::semigroup::Semigroup;
use crate::value::PropertyValue;

type SingleFn<T, V> = Arc<dyn Fn(&T) -> V + Send + Sync>;
type EachFn<T, V> = Arc<dyn Fn(&T) -> Vec<V> + Send + Sync>;

/// How a chain reads its value(s) from the object.
pub(crate) enum Selector<T, V> {
    /// One value.
    Single(SingleFn<T, V>),
    /// One value per collection element, keyed `path[i]`.
    Each(EachFn<T, V>),
}

/// One step of a chain.
pub(crate) enum Component<T, V> {
    Check(Primitive<T, V>),
    Child(Arc<dyn NestedRules<V>>),
}

/// An ordered list of primitives bound to one property.
pub(crate) struct RuleChain<T, V> {
    pub(crate) path: String,
    pub(crate) display_name: Option<String>,
    selector: Selector<T, V>,
    pub(crate) components: Vec<Component<T, V>>,
    pub(crate) cascade: Option<CascadeMode>,
    pub(crate) conditions: Vec<Condition<T>>,
    pub(crate) rule_sets: Vec<String>,
}

/// One value under evaluation, with its failure key and display name.
struct Target<V> {
    key: String,
    display: String,
    value: V,
}

impl<T, V> RuleChain<T, V>
where
    V: PropertyValue,
{
    pub(crate) fn new(
        path: String,
        selector: Selector<T, V>,
        rule_sets: Vec<String>,
        conditions: Vec<Condition<T>>,
    ) -> Self {
        RuleChain {
            path,
            display_name: None,
            selector,
            components: Vec::new(),
            cascade: None,
            conditions,
            rule_sets,
        }
    }

    fn targets(&self, instance: &T, ctx: &ExecutionContext<'_>) -> Vec<Target<V>> {
        let key = ctx.key(&self.path);
        let display = self
            .display_name
            .clone()
            .unwrap_or_else(|| self.path.clone());
        match &self.selector {
            Selector::Single(select) => vec![Target {
                key,
                display,
                value: select(instance),
            }],
            Selector::Each(select) => select(instance)
                .into_iter()
                .enumerate()
                .map(|(i, value)| Target {
                    key: format!("{key}[{i}]"),
                    display: format!("{display}[{i}]"),
                    value,
                })
                .collect(),
        }
    }

    /// `Ok(false)` when a guard fails; an error when a guard is asynchronous.
    fn guards_hold(
        &self,
        instance: &T,
        ctx: &ExecutionContext<'_>,
    ) -> Result<bool, ValidationError> {
        for condition in &self.conditions {
            match condition.evaluate_sync(instance) {
                Some(true) => {}
                Some(false) => return Ok(false),
                None => return Err(ValidationError::async_misuse(ctx.key(&self.path))),
            }
        }
        Ok(true)
    }

    async fn guards_hold_async(&self, instance: &T) -> bool {
        for condition in &self.conditions {
            if !condition.evaluate(instance).await {
                return false;
            }
        }
        true
    }

    fn run_target(
        &self,
        target: &Target<V>,
        instance: &T,
        ctx: &ExecutionContext<'_>,
    ) -> Result<Vec<ValidationFailure>, ValidationError> {
        let cascade = ctx.cascade_for(self.cascade);
        let checked = ctx.options.includes(&target.key);
        let descend = checked || ctx.options.leads_to(&target.key);
        let misuse = || ValidationError::async_misuse(target.key.clone());

        let mut failures = Vec::new();
        for component in &self.components {
            match component {
                Component::Check(primitive) => {
                    if !checked {
                        continue;
                    }
                    if !primitive.applies_sync(instance).ok_or_else(misuse)? {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(
                            property = %target.key,
                            rule = %primitive.kind(),
                            "condition not met, rule skipped"
                        );
                        continue;
                    }
                    if !primitive.check_sync(&target.value, instance).ok_or_else(misuse)? {
                        failures.push(primitive.failure(
                            &target.key,
                            &target.display,
                            &target.value,
                            instance,
                            ctx.messages,
                        ));
                    }
                }
                Component::Child(child) if descend => {
                    failures.extend(child.run(&target.value, &target.key, ctx)?);
                }
                Component::Child(_) => {}
            }
            if cascade == CascadeMode::Stop && !failures.is_empty() {
                break;
            }
        }
        Ok(failures)
    }

    async fn run_target_async(
        &self,
        target: &Target<V>,
        instance: &T,
        ctx: &ExecutionContext<'_>,
    ) -> Vec<ValidationFailure> {
        let cascade = ctx.cascade_for(self.cascade);
        let checked = ctx.options.includes(&target.key);
        let descend = checked || ctx.options.leads_to(&target.key);

        let mut failures = Vec::new();
        for component in &self.components {
            match component {
                Component::Check(primitive) => {
                    if !checked {
                        continue;
                    }
                    if !primitive.applies(instance).await {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(
                            property = %target.key,
                            rule = %primitive.kind(),
                            "condition not met, rule skipped"
                        );
                        continue;
                    }
                    if !primitive.check(&target.value, instance).await {
                        failures.push(primitive.failure(
                            &target.key,
                            &target.display,
                            &target.value,
                            instance,
                            ctx.messages,
                        ));
                    }
                }
                Component::Child(child) if descend => {
                    failures.extend(child.run_async(&target.value, &target.key, ctx).await);
                }
                Component::Child(_) => {}
            }
            if cascade == CascadeMode::Stop && !failures.is_empty() {
                break;
            }
        }
        failures
    }
}

impl<T, V> PropertyRule<T> for RuleChain<T, V>
where
    T: Sync,
    V: PropertyValue,
{
    fn path(&self) -> &str {
        &self.path
    }

    fn rule_sets(&self) -> &[String] {
        &self.rule_sets
    }

    fn requires_async(&self) -> bool {
        self.conditions.iter().any(Condition::is_async)
            || self.components.iter().any(|component| match component {
                Component::Check(primitive) => primitive.is_async(),
                Component::Child(child) => child.requires_async(),
            })
    }

    fn run(
        &self,
        instance: &T,
        ctx: &ExecutionContext<'_>,
    ) -> Result<Vec<ValidationFailure>, ValidationError> {
        if !self.guards_hold(instance, ctx)? {
            #[cfg(feature = "tracing")]
            tracing::trace!(property = %ctx.key(&self.path), "condition not met, chain skipped");
            return Ok(Vec::new());
        }
        let mut failures = Vec::new();
        for target in self.targets(instance, ctx) {
            failures = failures.combine(self.run_target(&target, instance, ctx)?);
        }
        Ok(failures)
    }

    fn run_async<'a>(
        &'a self,
        instance: &'a T,
        ctx: &'a ExecutionContext<'a>,
    ) -> BoxFuture<'a, Vec<ValidationFailure>> {
        async move {
            if !self.guards_hold_async(instance).await {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    property = %ctx.key(&self.path),
                    "condition not met, chain skipped"
                );
                return Vec::new();
            }
            let mut failures = Vec::new();
            for target in self.targets(instance, ctx) {
                failures = failures.combine(self.run_target_async(&target, instance, ctx).await);
            }
            failures
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageTable;
    use crate::options::ValidationOptions;
    use crate::primitive::{greater_than, must, not_empty, required};

    struct Basket {
        owner: String,
        items: Vec<i32>,
    }

    fn basket() -> Basket {
        Basket {
            owner: String::new(),
            items: vec![3, -1, 0],
        }
    }

    fn owner_chain() -> RuleChain<Basket, String> {
        let mut chain = RuleChain::new(
            "owner".to_string(),
            Selector::Single(Arc::new(|b: &Basket| b.owner.clone())),
            Vec::new(),
            Vec::new(),
        );
        chain.components.push(Component::Check(required()));
        chain.components.push(Component::Check(not_empty()));
        chain
    }

    fn run(
        chain: &RuleChain<Basket, impl PropertyValue>,
        options: &ValidationOptions,
    ) -> Vec<ValidationFailure> {
        let messages = MessageTable::english();
        let ctx = ExecutionContext::root(options, &messages, CascadeMode::Continue);
        chain.run(&basket(), &ctx).expect("synchronous chain")
    }

    #[test]
    fn test_continue_records_every_failure() {
        let failures = run(&owner_chain(), &ValidationOptions::default());
        let codes: Vec<&str> = failures.iter().map(|f| f.error_code.as_str()).collect();
        assert_eq!(codes, vec!["required", "not_empty"]);
    }

    #[test]
    fn test_stop_halts_after_first_failure() {
        let mut chain = owner_chain();
        chain.cascade = Some(CascadeMode::Stop);
        let failures = run(&chain, &ValidationOptions::default());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].error_code, "required");
    }

    #[test]
    fn test_false_guard_skips_chain() {
        let mut chain = owner_chain();
        chain.conditions.push(Condition::when(|b: &Basket| b.items.len() > 10));
        assert!(run(&chain, &ValidationOptions::default()).is_empty());
    }

    #[test]
    fn test_each_keys_elements_by_index() {
        let mut chain = RuleChain::new(
            "items".to_string(),
            Selector::Each(Arc::new(|b: &Basket| b.items.clone())),
            Vec::new(),
            Vec::new(),
        );
        chain.display_name = Some("Item".to_string());
        chain.components.push(Component::Check(greater_than(0)));

        let failures = run(&chain, &ValidationOptions::default());
        let keys: Vec<&str> = failures.iter().map(|f| f.property_name.as_str()).collect();
        assert_eq!(keys, vec!["items[1]", "items[2]"]);
        assert_eq!(failures[0].message, "'Item[1]' must be greater than '0'.");
    }

    #[test]
    fn test_include_filter_on_elements() {
        let mut chain = RuleChain::new(
            "items".to_string(),
            Selector::Each(Arc::new(|b: &Basket| b.items.clone())),
            Vec::new(),
            Vec::new(),
        );
        chain.components.push(Component::Check(greater_than(0)));
        let only_last = ValidationOptions::configured(|o| {
            o.include_property("items[2]");
        });
        let failures = run(&chain, &only_last);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].property_name, "items[2]");
    }

    #[test]
    fn test_async_primitive_is_misuse_on_sync_path() {
        let mut chain = owner_chain();
        chain.components.push(Component::Check(
            must(|_: &String, _: &Basket| true).when_async(|_: &Basket| Box::pin(async { true })),
        ));
        assert!(chain.requires_async());

        let messages = MessageTable::english();
        let options = ValidationOptions::default();
        let ctx = ExecutionContext::root(&options, &messages, CascadeMode::Continue);
        assert_eq!(
            chain.run(&basket(), &ctx),
            Err(ValidationError::async_misuse("owner"))
        );
    }

    #[test]
    fn test_async_path_matches_sync_path() {
        let chain = owner_chain();
        let messages = MessageTable::english();
        let options = ValidationOptions::default();
        let ctx = ExecutionContext::root(&options, &messages, CascadeMode::Continue);
        let instance = basket();

        let sync = chain.run(&instance, &ctx).expect("synchronous chain");
        let async_ = futures::executor::block_on(chain.run_async(&instance, &ctx));
        assert_eq!(sync, async_);
    }
}
