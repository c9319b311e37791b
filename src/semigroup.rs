//! Semigroup trait for merging validation output
//!
//! A Semigroup is a type with an associative binary operation. Validators use it
//! to accumulate failures chain by chain instead of short-circuiting, and callers
//! can use it to merge the results of several validators over one object.
//!
//! # Mathematical Properties
//!
//! The `combine` operation must be associative:
//! ```text
//! a.combine(b).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! # Examples
//!
//! ```
//! use ruleflow::{Semigroup, ValidationFailure, ValidationResult};
//!
//! let name = ValidationFailure::new("name", "'name' is required.");
//! let iban = ValidationFailure::new("iban", "'iban' is required.");
//! let profile = ValidationResult::new(vec![name]);
//! let billing = ValidationResult::new(vec![iban]);
//!
//! let merged = profile.combine(billing);
//! assert_eq!(merged.len(), 2);
//! assert_eq!(merged.failures()[1].property_name, "iban");
//! ```

use crate::result::ValidationResult;

/// A type that supports an associative binary operation
///
/// # Laws
///
/// Implementations must satisfy the associativity law:
/// ```text
/// a.combine(b).combine(c) == a.combine(b.combine(c))
/// ```
///
/// `combine` takes `self` by value; clone first to keep the originals.
pub trait Semigroup: Sized {
    /// Combine this value with another value associatively
    ///
    /// ```
    /// use ruleflow::Semigroup;
    ///
    /// assert_eq!(vec![1, 2].combine(vec![3]), vec![1, 2, 3]);
    /// ```
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

/// Failures are concatenated in order; executed rule sets are unioned.
impl Semigroup for ValidationResult {
    fn combine(self, other: Self) -> Self {
        let mut rule_sets = self.rule_sets_executed().to_vec();
        for set in other.rule_sets_executed() {
            if !rule_sets.contains(set) {
                rule_sets.push(set.clone());
            }
        }
        let failures = self.into_failures().combine(other.into_failures());
        ValidationResult::new(failures).with_rule_sets(rule_sets)
    }
}
