//! Presence primitives: required, null and emptiness checks

use super::{Primitive, RuleKind};
use crate::value::{Emptiness, PropertyValue};

/// Fails on a missing value, a blank string or an empty collection.
///
/// `0` and `false` are present values and pass.
pub fn required<T, V>() -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: Emptiness,
{
    Primitive::new(RuleKind::Required, |value: &V, _: &T| {
        value.present().is_some_and(|v| !v.is_blank())
    })
}

/// Fails only when the value is missing.
pub fn not_null<T, V: PropertyValue>() -> Primitive<T, V> {
    Primitive::new(RuleKind::NotNull, |value: &V, _: &T| value.present().is_some())
}

/// Passes only when the value is missing.
pub fn is_null<T, V: PropertyValue>() -> Primitive<T, V> {
    Primitive::new(RuleKind::IsNull, |value: &V, _: &T| value.present().is_none())
}

/// Passes when the value is missing or holds its empty/default form
/// (`""`, `[]`, `0`, `false`).
pub fn empty<T, V>() -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: Emptiness,
{
    Primitive::new(RuleKind::Empty, |value: &V, _: &T| {
        value.present().is_none_or(|v| v.is_empty_value())
    })
}

/// Inverse of [`empty`].
pub fn not_empty<T, V>() -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: Emptiness,
{
    Primitive::new(RuleKind::NotEmpty, |value: &V, _: &T| {
        value.present().is_some_and(|v| !v.is_empty_value())
    })
}
