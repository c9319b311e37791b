//! Length primitives
//!
//! Text is measured in characters, collections in items. A missing value fails
//! every length check.

use super::{Placeholders, Primitive, RuleKind};
use crate::value::{HasLength, PropertyValue};

fn total_length<V>(value: &V) -> usize
where
    V: PropertyValue,
    V::Inner: HasLength,
{
    value.present().map_or(0, HasLength::length)
}

/// Passes when `min <= length <= max`.
///
/// Supplies `{minLength}`, `{maxLength}` and `{totalLength}`.
pub fn length<T, V>(min: usize, max: usize) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: HasLength,
{
    Primitive::new(RuleKind::Length, move |value: &V, _: &T| {
        value
            .present()
            .is_some_and(|v| (min..=max).contains(&v.length()))
    })
    .with_placeholders(move |value: &V, _: &T| -> Placeholders {
        vec![
            ("minLength", min.to_string()),
            ("maxLength", max.to_string()),
            ("totalLength", total_length(value).to_string()),
        ]
    })
}

/// Passes when the length is at least `min`.
pub fn min_length<T, V>(min: usize) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: HasLength,
{
    Primitive::new(RuleKind::MinLength, move |value: &V, _: &T| {
        value.present().is_some_and(|v| v.length() >= min)
    })
    .with_placeholders(move |value: &V, _: &T| -> Placeholders {
        vec![
            ("minLength", min.to_string()),
            ("totalLength", total_length(value).to_string()),
        ]
    })
}

/// Passes when the length is at most `max`.
pub fn max_length<T, V>(max: usize) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: HasLength,
{
    Primitive::new(RuleKind::MaxLength, move |value: &V, _: &T| {
        value.present().is_some_and(|v| v.length() <= max)
    })
    .with_placeholders(move |value: &V, _: &T| -> Placeholders {
        vec![
            ("maxLength", max.to_string()),
            ("totalLength", total_length(value).to_string()),
        ]
    })
}
