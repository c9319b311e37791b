//! Tests and examples for the testing utilities
//!
//! This test suite demonstrates patterns for testing code that declares validators.

use ruleflow::prelude::*;
use ruleflow::{
    assert_failure_for, assert_invalid, assert_messages, assert_no_failure_for, assert_valid,
};

// Example domain types for testing
#[derive(Debug, Clone, PartialEq)]
struct User {
    email: String,
    age: i32,
    nickname: Option<String>,
}

impl User {
    fn new(email: &str, age: i32) -> Self {
        Self {
            email: email.to_string(),
            age,
            nickname: None,
        }
    }
}

fn user_validator() -> Validator<User> {
    Validator::builder()
        .rule_for("email", |u: &User| u.email.clone())
        .with_message("Email must contain @ and .")
        .rule(must(|e: &String, _: &User| e.contains('@') && e.contains('.')))
        .rule_for("age", |u: &User| u.age)
        .with_message("Must be 18 or older")
        .rule(greater_than_or_equals(18))
        .rule_for("nickname", |u: &User| u.nickname.clone())
        .when(|u: &User| u.nickname.is_some())
        .with_severity(Severity::Warning)
        .rule(max_length(12))
        .build()
}

// Tests demonstrating assertion macros

#[test]
fn test_assert_valid_with_valid_user() {
    let result = user_validator().validate(&User::new("user@example.com", 25)).unwrap();
    assert_valid!(result);
}

#[test]
fn test_assert_invalid_with_invalid_email() {
    let result = user_validator().validate(&User::new("invalid", 25)).unwrap();
    assert_invalid!(result);
    assert_failure_for!(result, "email");
    assert_no_failure_for!(result, "age");
}

#[test]
fn test_assert_messages_with_specific_error() {
    let result = user_validator().validate(&User::new("invalid", 25)).unwrap();
    assert_messages!(result, "email", ["Email must contain @ and ."]);
}

#[test]
fn test_accumulating_multiple_errors() {
    let result = user_validator().validate(&User::new("invalid", 15)).unwrap();
    assert_invalid!(result);
    assert_eq!(result.len(), 2);
    assert_no_failure_for!(result, "nickname");
    assert_messages!(result, "email", ["Email must contain @ and ."]);
    assert_messages!(result, "age", ["Must be 18 or older"]);
}

#[test]
fn test_warnings_pass_assert_valid() {
    let user = User {
        nickname: Some("a very long nickname".into()),
        ..User::new("user@example.com", 25)
    };
    let result = user_validator().validate(&user).unwrap();
    assert_valid!(result);
    assert_failure_for!(result, "nickname");
    assert_eq!(result.warnings().count(), 1);
}

#[test]
#[should_panic(expected = "Expected valid result")]
fn test_assert_valid_panics_with_messages() {
    let result = user_validator().validate(&User::new("invalid", 25)).unwrap();
    assert_valid!(result);
}

#[test]
#[should_panic(expected = "Expected invalid result")]
fn test_assert_invalid_panics_on_warnings_only() {
    let user = User {
        nickname: Some("a very long nickname".into()),
        ..User::new("user@example.com", 25)
    };
    assert_invalid!(user_validator().validate(&user).unwrap());
}

#[test]
#[should_panic(expected = "Expected no failure for `email`")]
fn test_assert_no_failure_for_panics() {
    let result = user_validator().validate(&User::new("invalid", 25)).unwrap();
    assert_no_failure_for!(result, "email");
}

#[test]
#[should_panic(expected = "messages for `age`")]
fn test_assert_messages_panics_on_mismatch() {
    let result = user_validator().validate(&User::new("user@example.com", 3)).unwrap();
    assert_messages!(result, "age", ["Too young"]);
}

// Property-based testing examples (only runs with proptest feature)

#[cfg(feature = "proptest")]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_email_validation_with_at_and_dot(
            local in "[a-z]{1,10}",
            domain in "[a-z]{1,10}",
            tld in "[a-z]{2,5}"
        ) {
            let email = format!("{}@{}.{}", local, domain, tld);
            let result = user_validator().validate(&User::new(&email, 30)).unwrap();
            assert_valid!(result);
        }

        #[test]
        fn test_age_validation_below_threshold(age in 0..18i32) {
            let result = user_validator().validate(&User::new("user@example.com", age)).unwrap();
            assert_failure_for!(result, "age");
        }

        #[test]
        fn test_severity_override_controls_validity(severity in any::<Severity>()) {
            let validator = Validator::builder()
                .rule_for("age", |u: &User| u.age)
                .with_severity(severity)
                .rule(greater_than(100))
                .build();
            let result = validator.validate(&User::new("user@example.com", 1)).unwrap();
            prop_assert_eq!(result.is_valid(), severity != Severity::Error);
            prop_assert_eq!(result.failures()[0].severity, severity);
        }
    }
}
