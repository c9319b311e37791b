//! Boolean and truthiness primitives

use super::{Primitive, RuleKind};
use crate::value::{PropertyValue, Truthiness};

/// Passes only on `true`.
pub fn is_true<T, V>() -> Primitive<T, V>
where
    V: PropertyValue<Inner = bool>,
{
    Primitive::new(RuleKind::IsTrue, |value: &V, _: &T| {
        value.present() == Some(&true)
    })
}

/// Passes only on `false`.
pub fn is_false<T, V>() -> Primitive<T, V>
where
    V: PropertyValue<Inner = bool>,
{
    Primitive::new(RuleKind::IsFalse, |value: &V, _: &T| {
        value.present() == Some(&false)
    })
}

/// Passes on a present, truthy value.
pub fn is_truthy<T, V>() -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: Truthiness,
{
    Primitive::new(RuleKind::IsTruthy, |value: &V, _: &T| {
        value.present().is_some_and(Truthiness::is_truthy)
    })
}

/// Passes on a missing or falsy value.
pub fn is_falsy<T, V>() -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: Truthiness,
{
    Primitive::new(RuleKind::IsFalsy, |value: &V, _: &T| {
        value.present().is_none_or(|v| !v.is_truthy())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::test_support::passes;

    #[test]
    fn test_true_and_false() {
        assert!(passes(&is_true::<(), bool>(), true));
        assert!(!passes(&is_true::<(), Option<bool>>(), None));
        assert!(passes(&is_false::<(), bool>(), false));
        assert!(!passes(&is_false::<(), Option<bool>>(), None));
    }

    #[test]
    fn test_truthy_and_falsy() {
        assert!(passes(&is_truthy::<(), i32>(), 7));
        assert!(!passes(&is_truthy::<(), String>(), String::new()));
        assert!(!passes(&is_truthy::<(), Option<u8>>(), None));

        assert!(passes(&is_falsy::<(), f64>(), f64::NAN));
        assert!(passes(&is_falsy::<(), Option<String>>(), None));
        assert!(!passes(&is_falsy::<(), String>(), "x".into()));
    }
}
