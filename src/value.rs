//! Property values as seen by validation rules
//!
//! Every property selected by a rule chain implements [`PropertyValue`]. The trait
//! answers two questions the engine needs regardless of the concrete type:
//!
//! - Is the value present at all? `Option::None` is the only "missing" value.
//! - What was attempted? A type-erased [`AttemptedValue`] snapshot is stored in
//!   every failure so results can be inspected without the original object.
//!
//! Capability traits ([`HasLength`], [`Emptiness`], [`Truthiness`]) are
//! implemented on the *inner* type, so `Option<String>` and `String` both get
//! length checks through `str`.
//!
//! # Example
//!
//! ```
//! use ruleflow::value::{AttemptedValue, HasLength, PropertyValue};
//!
//! let name = Some("alice".to_string());
//! assert_eq!(name.present().map(HasLength::length), Some(5));
//! assert_eq!(name.attempted(), AttemptedValue::Text("alice".into()));
//!
//! let missing: Option<String> = None;
//! assert!(missing.present().is_none());
//! assert_eq!(missing.attempted(), AttemptedValue::Null);
//! ```

use std::fmt;

/// A snapshot of the value a failing rule was evaluated against.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum AttemptedValue {
    /// The value was missing (`None`).
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// Text, including single characters.
    Text(String),
    /// A sequence of values.
    List(Vec<AttemptedValue>),
    /// Any other type, rendered through `Debug`.
    Opaque(String),
}

impl AttemptedValue {
    /// Returns `true` for [`AttemptedValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, AttemptedValue::Null)
    }
}

impl fmt::Display for AttemptedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptedValue::Null => f.write_str("null"),
            AttemptedValue::Bool(b) => write!(f, "{}", b),
            AttemptedValue::Int(n) => write!(f, "{}", n),
            AttemptedValue::UInt(n) => write!(f, "{}", n),
            AttemptedValue::Float(n) => write!(f, "{}", n),
            AttemptedValue::Text(s) | AttemptedValue::Opaque(s) => f.write_str(s),
            AttemptedValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A value that can be the target of a rule chain.
///
/// `Inner` is the type capability traits are looked up on. For plain values it
/// is the value itself (or its borrowed form, `str` for `String`); for
/// `Option<X>` it is `X::Inner`, with `None` reported as missing.
///
/// Implement it for your own types with [`property_value!`](crate::property_value).
pub trait PropertyValue: Send + Sync {
    /// The type capability traits are evaluated on.
    type Inner: ?Sized;

    /// The present value, or `None` when the value is missing.
    fn present(&self) -> Option<&Self::Inner>;

    /// Snapshot used as the failure's attempted value.
    fn attempted(&self) -> AttemptedValue;
}

macro_rules! numeric_value {
    ($variant:ident as $cast:ty => $($t:ty),+ $(,)?) => {
        $(
            impl PropertyValue for $t {
                type Inner = $t;

                #[inline]
                fn present(&self) -> Option<&$t> {
                    Some(self)
                }

                fn attempted(&self) -> AttemptedValue {
                    AttemptedValue::$variant(*self as $cast)
                }
            }
        )+
    };
}

numeric_value!(Int as i64 => i8, i16, i32, i64, isize);
numeric_value!(UInt as u64 => u8, u16, u32, u64, usize);
numeric_value!(Float as f64 => f32, f64);

impl PropertyValue for bool {
    type Inner = bool;

    #[inline]
    fn present(&self) -> Option<&bool> {
        Some(self)
    }

    fn attempted(&self) -> AttemptedValue {
        AttemptedValue::Bool(*self)
    }
}

impl PropertyValue for char {
    type Inner = char;

    #[inline]
    fn present(&self) -> Option<&char> {
        Some(self)
    }

    fn attempted(&self) -> AttemptedValue {
        AttemptedValue::Text(self.to_string())
    }
}

impl PropertyValue for String {
    type Inner = str;

    #[inline]
    fn present(&self) -> Option<&str> {
        Some(self.as_str())
    }

    fn attempted(&self) -> AttemptedValue {
        AttemptedValue::Text(self.clone())
    }
}

impl PropertyValue for &str {
    type Inner = str;

    #[inline]
    fn present(&self) -> Option<&str> {
        Some(self)
    }

    fn attempted(&self) -> AttemptedValue {
        AttemptedValue::Text((*self).to_string())
    }
}

impl<X: PropertyValue> PropertyValue for Vec<X> {
    type Inner = [X];

    #[inline]
    fn present(&self) -> Option<&[X]> {
        Some(self.as_slice())
    }

    fn attempted(&self) -> AttemptedValue {
        AttemptedValue::List(self.iter().map(PropertyValue::attempted).collect())
    }
}

impl<X: PropertyValue> PropertyValue for Option<X> {
    type Inner = X::Inner;

    #[inline]
    fn present(&self) -> Option<&X::Inner> {
        self.as_ref().and_then(PropertyValue::present)
    }

    fn attempted(&self) -> AttemptedValue {
        match self {
            Some(value) => value.attempted(),
            None => AttemptedValue::Null,
        }
    }
}

/// Implement [`PropertyValue`] for a user type.
///
/// The type becomes its own `Inner`, and the attempted value is its `Debug`
/// rendering. Use this for nested objects validated with `set_validator`.
///
/// # Example
///
/// ```
/// use ruleflow::property_value;
/// use ruleflow::value::{AttemptedValue, PropertyValue};
///
/// #[derive(Debug, Clone)]
/// struct Address {
///     city: String,
/// }
///
/// property_value!(Address);
///
/// let addr = Address { city: "Oslo".into() };
/// assert!(addr.present().is_some());
/// assert!(matches!(addr.attempted(), AttemptedValue::Opaque(_)));
/// ```
#[macro_export]
macro_rules! property_value {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::value::PropertyValue for $t {
                type Inner = $t;

                fn present(&self) -> ::core::option::Option<&$t> {
                    ::core::option::Option::Some(self)
                }

                fn attempted(&self) -> $crate::value::AttemptedValue {
                    $crate::value::AttemptedValue::Opaque(::std::format!("{:?}", self))
                }
            }
        )+
    };
}

/// Values with a measurable length.
pub trait HasLength {
    /// Length in characters for text, in items for collections.
    fn length(&self) -> usize;
}

impl HasLength for str {
    fn length(&self) -> usize {
        self.chars().count()
    }
}

impl<X> HasLength for [X] {
    fn length(&self) -> usize {
        self.len()
    }
}

/// Emptiness as understood by `required`, `empty` and `not_empty`.
pub trait Emptiness {
    /// The value carries no content: blank text or an empty collection.
    fn is_blank(&self) -> bool;

    /// The value equals its type's default (zero, `false`, blank text, empty collection).
    fn is_empty_value(&self) -> bool {
        self.is_blank()
    }
}

impl Emptiness for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl<X> Emptiness for [X] {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Emptiness for bool {
    fn is_blank(&self) -> bool {
        false
    }

    fn is_empty_value(&self) -> bool {
        !*self
    }
}

impl Emptiness for char {
    fn is_blank(&self) -> bool {
        self.is_whitespace()
    }

    fn is_empty_value(&self) -> bool {
        *self == '\0' || self.is_whitespace()
    }
}

macro_rules! numeric_emptiness {
    ($zero:expr => $($t:ty),+) => {
        $(
            impl Emptiness for $t {
                fn is_blank(&self) -> bool {
                    false
                }

                fn is_empty_value(&self) -> bool {
                    *self == $zero
                }
            }
        )+
    };
}

numeric_emptiness!(0 => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
numeric_emptiness!(0.0 => f32, f64);

/// Truthiness in the loose, form-input sense.
///
/// `false`, zero, `NaN` and empty text are falsy. Present collections are truthy
/// even when empty.
pub trait Truthiness {
    /// Whether the value is truthy.
    fn is_truthy(&self) -> bool;
}

impl Truthiness for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthiness for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthiness for char {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl<X> Truthiness for [X] {
    fn is_truthy(&self) -> bool {
        true
    }
}

macro_rules! integer_truthiness {
    ($($t:ty),+) => {
        $(
            impl Truthiness for $t {
                fn is_truthy(&self) -> bool {
                    *self != 0
                }
            }
        )+
    };
}

integer_truthiness!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Truthiness for f32 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Truthiness for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Point {
        x: i32,
    }

    crate::property_value!(Point);

    #[test]
    fn test_option_reports_missing() {
        let none: Option<i32> = None;
        assert!(none.present().is_none());
        assert_eq!(Some(3).present(), Some(&3));
    }

    #[test]
    fn test_nested_option_uses_inner_presence() {
        let value: Option<Option<String>> = Some(None);
        assert!(value.present().is_none());
        assert_eq!(value.attempted(), AttemptedValue::Null);
    }

    #[test]
    fn test_attempted_display() {
        assert_eq!(AttemptedValue::Null.to_string(), "null");
        assert_eq!(42u8.attempted().to_string(), "42");
        assert_eq!(
            vec![1, 2, 3].attempted().to_string(),
            "[1, 2, 3]".to_string()
        );
        assert_eq!(true.attempted(), AttemptedValue::Bool(true));
    }

    #[test]
    fn test_user_type_is_opaque() {
        let p = Point { x: 4 };
        assert_eq!(p.present().map(|p| p.x), Some(4));
        assert_eq!(p.attempted(), AttemptedValue::Opaque("Point { x: 4 }".into()));
    }

    #[test]
    fn test_length_counts_chars() {
        assert_eq!("héllo".length(), 5);
        assert_eq!([1, 2][..].length(), 2);
    }

    #[test]
    fn test_emptiness() {
        assert!("   ".is_blank());
        assert!(!"a".is_blank());
        assert!(!0i32.is_blank());
        assert!(0i32.is_empty_value());
        assert!(false.is_empty_value());
        assert!(Vec::<u8>::new().as_slice().is_blank());
    }

    #[test]
    fn test_truthiness() {
        assert!(!0i32.is_truthy());
        assert!(!f64::NAN.is_truthy());
        assert!(!"".is_truthy());
        assert!("0".is_truthy());
        assert!(Vec::<u8>::new().as_slice().is_truthy());
    }
}
