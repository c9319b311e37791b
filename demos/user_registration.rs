//! User Registration Example
//!
//! Demonstrates declaring a validator for a registration form.
//! Shows practical patterns including:
//! - Chained primitives with message, code and severity overrides
//! - Conditions and rule sets
//! - Nested validators and per-element rules
//! - Asynchronous uniqueness checks
//! - Restricting a run to selected properties

use std::collections::HashSet;
use std::sync::Arc;

use futures::FutureExt;
use regex::Regex;
use ruleflow::prelude::*;
use ruleflow::property_value;

#[derive(Debug, Clone)]
struct Address {
    line1: String,
    country: String,
    postcode: Option<String>,
}

property_value!(Address);

#[derive(Debug, Clone)]
struct Registration {
    username: String,
    email: String,
    password: String,
    password_confirmation: String,
    age: Option<u32>,
    accepts_terms: bool,
    address: Option<Address>,
    interests: Vec<String>,
    referral_code: Option<String>,
}

fn sample() -> Registration {
    Registration {
        username: "ada".into(),
        email: "ada@example.com".into(),
        password: "correct horse".into(),
        password_confirmation: "correct horse".into(),
        age: Some(36),
        accepts_terms: true,
        address: Some(Address {
            line1: "12 St James's Square".into(),
            country: "GB".into(),
            postcode: Some("SW1Y 4JH".into()),
        }),
        interests: vec!["math".into(), "engines".into()],
        referral_code: None,
    }
}

fn address_validator() -> Validator<Address> {
    Validator::builder()
        .rule_for("line1", |a: &Address| a.line1.clone())
        .rule(not_empty())
        .rule_for("country", |a: &Address| a.country.clone())
        .rule(length(2, 2))
        .rule_for("postcode", |a: &Address| a.postcode.clone())
        .when(|a: &Address| a.country == "GB")
        .rule(required())
        .build()
}

fn registration_validator() -> Validator<Registration> {
    let email = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex");

    Validator::builder()
        .rule_for("username", |r: &Registration| r.username.clone())
        .cascade(CascadeMode::Stop)
        .rule(required())
        .rule(length(3, 20))
        .rule_for("email", |r: &Registration| r.email.clone())
        .with_name("Email address")
        .rule(not_empty())
        .rule(matches(email))
        .rule_for("password", |r: &Registration| r.password.clone())
        .rule(min_length(8))
        .rule_for("password_confirmation", |r: &Registration| {
            r.password_confirmation.clone()
        })
        .with_message("Passwords do not match.")
        .rule(equals_property("password", |r: &Registration| r.password.clone()))
        .rule_for("age", |r: &Registration| r.age)
        .rule(not_null())
        .rule(inclusive_between(13, 130))
        .rule_for("accepts_terms", |r: &Registration| r.accepts_terms)
        .rule(is_true())
        .rule_for("address", |r: &Registration| r.address.clone())
        .set_validator(address_validator())
        .rule_for_each("interests", |r: &Registration| r.interests.clone())
        .with_severity(Severity::Warning)
        .rule(max_length(20))
        .rule_set("promotion", |b| {
            b.rule_for("referral_code", |r: &Registration| r.referral_code.clone())
                .rule(required())
                .rule(length(6, 6))
        })
        .build()
}

// ==================== Examples ====================

/// Example 1: Valid registration
fn example_valid() {
    println!("\n=== Example 1: Valid Registration ===");

    let result = registration_validator().validate(&sample()).unwrap();
    println!("Valid: {}", result.is_valid());
}

/// Example 2: Accumulated failures
///
/// Every chain runs; failures come back in declaration order.
fn example_invalid() {
    println!("\n=== Example 2: Accumulated Failures ===");

    let form = Registration {
        username: "a".into(),
        email: "not-an-email".into(),
        password: "short".into(),
        password_confirmation: "shorter".into(),
        age: None,
        accepts_terms: false,
        address: Some(Address {
            line1: String::new(),
            country: "GB".into(),
            postcode: None,
        }),
        interests: vec!["an interest that is far too long".into()],
        referral_code: None,
    };

    let result = registration_validator().validate(&form).unwrap();
    println!("Valid: {}", result.is_valid());
    for (property, messages) in result.to_dictionary() {
        println!("  {}: {:?}", property, messages);
    }
    println!("Warnings: {}", result.warnings().count());
}

/// Example 3: Rule sets
fn example_rule_sets() {
    println!("\n=== Example 3: Rule Sets ===");

    let validator = registration_validator();
    let form = sample();

    let promotion = validator
        .validate_with(&form, |o| {
            o.rule_set("promotion");
        })
        .unwrap();
    println!("Promotion only: {}", promotion);

    let everything = validator
        .validate_with(&form, |o| {
            o.all_rule_sets();
        })
        .unwrap();
    println!(
        "All rule sets ({:?}): {} failure(s)",
        everything.rule_sets_executed(),
        everything.len()
    );
}

/// Example 4: Selected properties
fn example_include_properties() {
    println!("\n=== Example 4: Selected Properties ===");

    let form = Registration {
        username: String::new(),
        address: Some(Address {
            line1: String::new(),
            country: "France".into(),
            postcode: None,
        }),
        ..sample()
    };

    let result = registration_validator()
        .validate_with(&form, |o| {
            o.include_property("address.country");
        })
        .unwrap();
    println!("{}", result.to_string_with("; "));
}

/// Example 5: Asynchronous uniqueness check
async fn example_async() {
    println!("\n=== Example 5: Asynchronous Rules ===");

    let taken: Arc<HashSet<String>> = Arc::new(["admin".to_string()].into_iter().collect());

    let validator = Validator::builder()
        .include(&registration_validator())
        .rule_for("username", |r: &Registration| r.username.clone())
        .with_error_code("username_taken")
        .with_message("'{propertyValue}' is already registered.")
        .must_async(move |name: &String, _: &Registration| {
            let taken = Arc::clone(&taken);
            let name = name.clone();
            async move { !taken.contains(&name) }.boxed()
        })
        .build();

    let form = Registration {
        username: "admin".into(),
        ..sample()
    };

    match validator.validate(&form) {
        Ok(_) => println!("Unexpected synchronous success"),
        Err(e) => println!("Synchronous run refused: {}", e),
    }

    let result = validator.validate_async(&form).await;
    println!("Async: {}", result);
    println!("Codes: {:?}", result.errors_by_code("username"));
}

#[tokio::main]
async fn main() {
    println!("User Registration Examples");
    println!("==========================");

    example_valid();
    example_invalid();
    example_rule_sets();
    example_include_properties();
    example_async().await;

    println!("\n=== All examples completed successfully! ===");
}
