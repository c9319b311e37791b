//! User-defined predicates

use futures::future::BoxFuture;

use super::{Primitive, RuleKind};

/// A custom synchronous predicate over the value and the whole object.
///
/// ```
/// use ruleflow::prelude::*;
///
/// struct Order {
///     quantity: u32,
///     stock: u32,
/// }
///
/// let validator = Validator::builder()
///     .rule_for("quantity", |o: &Order| o.quantity)
///     .rule(
///         must(|qty: &u32, order: &Order| *qty <= order.stock)
///             .with_message("Not enough stock."),
///     )
///     .build();
///
/// let result = validator.validate(&Order { quantity: 5, stock: 2 }).unwrap();
/// assert_eq!(result.failures()[0].message, "Not enough stock.");
/// assert_eq!(result.failures()[0].error_code, "must");
/// ```
pub fn must<T, V, F>(predicate: F) -> Primitive<T, V>
where
    F: Fn(&V, &T) -> bool + Send + Sync + 'static,
{
    Primitive::new(RuleKind::Must, predicate)
}

/// A custom asynchronous predicate, e.g. a uniqueness lookup.
///
/// Chains holding one can only run through `validate_async`.
///
/// ```
/// use futures::FutureExt;
/// use ruleflow::prelude::*;
///
/// struct Signup {
///     email: String,
/// }
///
/// async fn is_unique(email: &str) -> bool {
///     email != "taken@example.com"
/// }
///
/// let validator = Validator::builder()
///     .rule_for("email", |s: &Signup| s.email.clone())
///     .rule(must_async(|email: &String, _: &Signup| is_unique(email).boxed()))
///     .build();
///
/// let signup = Signup { email: "taken@example.com".into() };
/// let result = futures::executor::block_on(validator.validate_async(&signup));
/// assert!(!result.is_valid());
/// assert!(validator.validate(&signup).is_err());
/// ```
pub fn must_async<T, V, F>(predicate: F) -> Primitive<T, V>
where
    F: for<'a> Fn(&'a V, &'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
{
    Primitive::new_async(RuleKind::MustAsync, predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn test_must_receives_object() {
        let rule = must(|value: &i32, limit: &i32| value < limit);
        assert_eq!(rule.check_sync(&3, &5), Some(true));
        assert_eq!(rule.check_sync(&9, &5), Some(false));
        assert_eq!(rule.kind(), RuleKind::Must);
    }

    #[test]
    fn test_must_async_has_no_sync_answer() {
        let rule = must_async(|value: &i32, _: &()| async move { *value > 0 }.boxed());
        assert!(rule.is_async());
        assert_eq!(rule.check_sync(&1, &()), None);
    }

    #[tokio::test]
    async fn test_must_async_awaits() {
        let rule = must_async(|value: &i32, _: &()| async move { *value > 0 }.boxed());
        assert!(rule.check(&1, &()).await);
        assert!(!rule.check(&-1, &()).await);
    }
}
