//! Equality, ordering and range primitives
//!
//! Thresholds are given in the owned form of the value's `Inner` type, so a
//! `String` property compares against a `String` and an `i32` property against
//! an `i32`. A missing value never satisfies an ordering check; `not_equals`
//! treats it as different from everything.
//!
//! The `*_property` variants read the comparison value from another property of
//! the same object and add a `{comparisonProperty}` placeholder.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::Display;
use std::sync::Arc;

use super::{Primitive, RuleKind};
use crate::value::PropertyValue;

type Owned<V> = <<V as PropertyValue>::Inner as ToOwned>::Owned;

fn borrowed<I: ?Sized + ToOwned>(owned: &I::Owned) -> &I {
    owned.borrow()
}

/// Passes when the value equals `expected`.
pub fn equals<T, V>(expected: Owned<V>) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: ToOwned + PartialEq + Display,
    Owned<V>: Send + Sync + 'static,
{
    let shown = borrowed::<V::Inner>(&expected).to_string();
    Primitive::new(RuleKind::Equals, move |value: &V, _: &T| {
        value
            .present()
            .is_some_and(|v| v == borrowed::<V::Inner>(&expected))
    })
    .with_placeholders(move |_, _| vec![("comparisonValue", shown.clone())])
}

/// Passes when the value differs from `unexpected`. A missing value passes.
pub fn not_equals<T, V>(unexpected: Owned<V>) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: ToOwned + PartialEq + Display,
    Owned<V>: Send + Sync + 'static,
{
    let shown = borrowed::<V::Inner>(&unexpected).to_string();
    Primitive::new(RuleKind::NotEquals, move |value: &V, _: &T| {
        value
            .present()
            .is_none_or(|v| v != borrowed::<V::Inner>(&unexpected))
    })
    .with_placeholders(move |_, _| vec![("comparisonValue", shown.clone())])
}

/// Passes when the value equals the property chosen by `selector`.
pub fn equals_property<T, V, F>(name: impl Into<String>, selector: F) -> Primitive<T, V>
where
    T: 'static,
    V: PropertyValue,
    V::Inner: ToOwned + PartialEq + Display,
    Owned<V>: 'static,
    F: Fn(&T) -> Owned<V> + Send + Sync + 'static,
{
    let selector = Arc::new(selector);
    let select = Arc::clone(&selector);
    Primitive::new(RuleKind::Equals, move |value: &V, root: &T| {
        let other = selector(root);
        value
            .present()
            .is_some_and(|v| v == borrowed::<V::Inner>(&other))
    })
    .with_placeholders(property_placeholders::<T, V>(name.into(), select))
}

/// Passes when the value differs from the property chosen by `selector`.
pub fn not_equals_property<T, V, F>(name: impl Into<String>, selector: F) -> Primitive<T, V>
where
    T: 'static,
    V: PropertyValue,
    V::Inner: ToOwned + PartialEq + Display,
    Owned<V>: 'static,
    F: Fn(&T) -> Owned<V> + Send + Sync + 'static,
{
    let selector = Arc::new(selector);
    let select = Arc::clone(&selector);
    Primitive::new(RuleKind::NotEquals, move |value: &V, root: &T| {
        let other = selector(root);
        value
            .present()
            .is_none_or(|v| v != borrowed::<V::Inner>(&other))
    })
    .with_placeholders(property_placeholders::<T, V>(name.into(), select))
}

/// Passes when the value is strictly greater than `threshold`.
pub fn greater_than<T, V>(threshold: Owned<V>) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: Send + Sync + 'static,
{
    compare(RuleKind::GreaterThan, threshold, |o| o == Ordering::Greater)
}

/// Passes when the value is greater than or equal to `threshold`.
pub fn greater_than_or_equals<T, V>(threshold: Owned<V>) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: Send + Sync + 'static,
{
    compare(RuleKind::GreaterThanOrEquals, threshold, |o| o != Ordering::Less)
}

/// Passes when the value is strictly less than `threshold`.
pub fn less_than<T, V>(threshold: Owned<V>) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: Send + Sync + 'static,
{
    compare(RuleKind::LessThan, threshold, |o| o == Ordering::Less)
}

/// Passes when the value is less than or equal to `threshold`.
pub fn less_than_or_equals<T, V>(threshold: Owned<V>) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: Send + Sync + 'static,
{
    compare(RuleKind::LessThanOrEquals, threshold, |o| o != Ordering::Greater)
}

/// [`greater_than`] against another property of the object.
///
/// ```
/// use ruleflow::prelude::*;
///
/// struct Range {
///     start: i32,
///     end: i32,
/// }
///
/// let validator = Validator::builder()
///     .rule_for("end", |r: &Range| r.end)
///     .rule(greater_than_property("start", |r: &Range| r.start))
///     .build();
///
/// let result = validator.validate(&Range { start: 5, end: 2 }).unwrap();
/// assert_eq!(result.failures()[0].message, "'end' must be greater than '5'.");
/// assert_eq!(result.failures()[0].placeholders["comparisonProperty"], "start");
/// ```
pub fn greater_than_property<T, V, F>(name: impl Into<String>, selector: F) -> Primitive<T, V>
where
    T: 'static,
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: 'static,
    F: Fn(&T) -> Owned<V> + Send + Sync + 'static,
{
    compare_property(RuleKind::GreaterThan, name.into(), selector, |o| {
        o == Ordering::Greater
    })
}

/// [`greater_than_or_equals`] against another property of the object.
pub fn greater_than_or_equals_property<T, V, F>(
    name: impl Into<String>,
    selector: F,
) -> Primitive<T, V>
where
    T: 'static,
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: 'static,
    F: Fn(&T) -> Owned<V> + Send + Sync + 'static,
{
    compare_property(RuleKind::GreaterThanOrEquals, name.into(), selector, |o| {
        o != Ordering::Less
    })
}

/// [`less_than`] against another property of the object.
pub fn less_than_property<T, V, F>(name: impl Into<String>, selector: F) -> Primitive<T, V>
where
    T: 'static,
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: 'static,
    F: Fn(&T) -> Owned<V> + Send + Sync + 'static,
{
    compare_property(RuleKind::LessThan, name.into(), selector, |o| {
        o == Ordering::Less
    })
}

/// [`less_than_or_equals`] against another property of the object.
pub fn less_than_or_equals_property<T, V, F>(
    name: impl Into<String>,
    selector: F,
) -> Primitive<T, V>
where
    T: 'static,
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: 'static,
    F: Fn(&T) -> Owned<V> + Send + Sync + 'static,
{
    compare_property(RuleKind::LessThanOrEquals, name.into(), selector, |o| {
        o != Ordering::Greater
    })
}

/// Passes when `lower <= value <= upper`.
pub fn inclusive_between<T, V>(lower: Owned<V>, upper: Owned<V>) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: Send + Sync + 'static,
{
    between(RuleKind::InclusiveBetween, lower, upper, |lo, hi| {
        lo != Ordering::Less && hi != Ordering::Greater
    })
}

/// Passes when `lower < value < upper`.
pub fn exclusive_between<T, V>(lower: Owned<V>, upper: Owned<V>) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: Send + Sync + 'static,
{
    between(RuleKind::ExclusiveBetween, lower, upper, |lo, hi| {
        lo == Ordering::Greater && hi == Ordering::Less
    })
}

fn compare<T, V>(
    kind: RuleKind,
    threshold: Owned<V>,
    accept: fn(Ordering) -> bool,
) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: Send + Sync + 'static,
{
    let shown = borrowed::<V::Inner>(&threshold).to_string();
    Primitive::new(kind, move |value: &V, _: &T| {
        value
            .present()
            .and_then(|v| v.partial_cmp(borrowed::<V::Inner>(&threshold)))
            .is_some_and(accept)
    })
    .with_placeholders(move |_, _| vec![("comparisonValue", shown.clone())])
}

fn compare_property<T, V, F>(
    kind: RuleKind,
    name: String,
    selector: F,
    accept: fn(Ordering) -> bool,
) -> Primitive<T, V>
where
    T: 'static,
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: 'static,
    F: Fn(&T) -> Owned<V> + Send + Sync + 'static,
{
    let selector = Arc::new(selector);
    let select = Arc::clone(&selector);
    Primitive::new(kind, move |value: &V, root: &T| {
        let other = selector(root);
        value
            .present()
            .and_then(|v| v.partial_cmp(borrowed::<V::Inner>(&other)))
            .is_some_and(accept)
    })
    .with_placeholders(property_placeholders::<T, V>(name, select))
}

fn property_placeholders<T, V>(
    name: String,
    select: Arc<dyn Fn(&T) -> Owned<V> + Send + Sync>,
) -> impl Fn(&V, &T) -> super::Placeholders + Send + Sync + 'static
where
    T: 'static,
    V: PropertyValue,
    V::Inner: ToOwned + Display,
    Owned<V>: 'static,
{
    move |_: &V, root: &T| {
        vec![
            ("comparisonValue", borrowed::<V::Inner>(&select(root)).to_string()),
            ("comparisonProperty", name.clone()),
        ]
    }
}

fn between<T, V>(
    kind: RuleKind,
    lower: Owned<V>,
    upper: Owned<V>,
    accept: fn(Ordering, Ordering) -> bool,
) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: ToOwned + PartialOrd + Display,
    Owned<V>: Send + Sync + 'static,
{
    let lower_shown = borrowed::<V::Inner>(&lower).to_string();
    let upper_shown = borrowed::<V::Inner>(&upper).to_string();
    Primitive::new(kind, move |value: &V, _: &T| {
        value.present().is_some_and(|v| {
            let lo = v.partial_cmp(borrowed::<V::Inner>(&lower));
            let hi = v.partial_cmp(borrowed::<V::Inner>(&upper));
            matches!((lo, hi), (Some(lo), Some(hi)) if accept(lo, hi))
        })
    })
    .with_placeholders(move |_, _| {
        vec![
            ("lowerBound", lower_shown.clone()),
            ("upperBound", upper_shown.clone()),
        ]
    })
}
