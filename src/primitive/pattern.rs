//! Regular-expression primitive

use regex::Regex;

use super::{Primitive, RuleKind};
use crate::value::PropertyValue;

/// Passes when the text matches `pattern`. A missing value fails.
///
/// Supplies `{pattern}`. Anchor the expression yourself if the whole value must
/// match.
///
/// ```
/// use regex::Regex;
/// use ruleflow::prelude::*;
///
/// struct Account {
///     handle: String,
/// }
///
/// let handle = Regex::new(r"^[a-z0-9_]+$").unwrap();
/// let validator = Validator::builder()
///     .rule_for("handle", |a: &Account| a.handle.clone())
///     .rule(matches(handle))
///     .build();
///
/// assert!(validator.validate(&Account { handle: "neo_1".into() }).unwrap().is_valid());
/// assert!(!validator.validate(&Account { handle: "Neo!".into() }).unwrap().is_valid());
/// ```
pub fn matches<T, V>(pattern: Regex) -> Primitive<T, V>
where
    V: PropertyValue,
    V::Inner: AsRef<str>,
{
    let shown = pattern.as_str().to_string();
    Primitive::new(RuleKind::Matches, move |value: &V, _: &T| {
        value.present().is_some_and(|v| pattern.is_match(v.as_ref()))
    })
    .with_placeholders(move |_, _| vec![("pattern", shown.clone())])
}
