//! End-to-end tests for synchronous validation
//!
//! Covers ordering, cascade modes, conditions, placeholders, rule sets,
//! property inclusion, nested validators and per-element rules.

use std::sync::Arc;

use regex::Regex;
use ruleflow::prelude::*;
use ruleflow::AttemptedValue;
use ruleflow::{
    assert_failure_for, assert_invalid, assert_messages, assert_no_failure_for, assert_valid,
    property_value,
};

#[derive(Debug, Clone)]
struct Address {
    street: String,
    city: String,
    postcode: String,
}

property_value!(Address);

#[derive(Debug, Clone)]
struct Customer {
    name: String,
    email: String,
    age: Option<u32>,
    has_discount: bool,
    discount: u32,
    address: Option<Address>,
    phones: Vec<String>,
}

fn valid_customer() -> Customer {
    Customer {
        name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        age: Some(36),
        has_discount: false,
        discount: 0,
        address: Some(Address {
            street: "12 St James's Square".into(),
            city: "London".into(),
            postcode: "SW1Y 4JH".into(),
        }),
        phones: vec!["+44 20 7946 0000".into()],
    }
}

fn address_validator() -> Validator<Address> {
    Validator::builder()
        .rule_for("street", |a: &Address| a.street.clone())
        .rule(not_empty())
        .rule_for("city", |a: &Address| a.city.clone())
        .rule(not_empty())
        .rule_for("postcode", |a: &Address| a.postcode.clone())
        .rule(matches(Regex::new(r"^[A-Z0-9 ]{5,8}$").unwrap()))
        .build()
}

fn customer_validator() -> Validator<Customer> {
    Validator::builder()
        .rule_for("name", |c: &Customer| c.name.clone())
        .rule(not_empty())
        .rule(length(2, 50))
        .rule_for("email", |c: &Customer| c.email.clone())
        .rule(not_empty())
        .rule(matches(Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap()))
        .rule_for("age", |c: &Customer| c.age)
        .rule(not_null())
        .rule(greater_than_or_equals(18))
        .rule_for("discount", |c: &Customer| c.discount)
        .when(|c: &Customer| c.has_discount)
        .rule(inclusive_between(1, 50))
        .rule_for("address", |c: &Customer| c.address.clone())
        .set_validator(address_validator())
        .rule_for_each("phones", |c: &Customer| c.phones.clone())
        .rule(min_length(7))
        .build()
}

#[test]
fn valid_customer_passes() {
    let result = customer_validator().validate(&valid_customer()).unwrap();
    assert_valid!(result);
    assert!(result.is_empty());
}

#[test]
fn failures_follow_declaration_order() {
    let customer = Customer {
        name: String::new(),
        email: "nope".into(),
        age: Some(12),
        ..valid_customer()
    };
    let result = customer_validator().validate(&customer).unwrap();
    assert_invalid!(result);

    let dictionary = result.to_dictionary();
    let keys: Vec<&str> = dictionary.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "email", "age"]);
    assert_messages!(
        result,
        "name",
        [
            "'name' must not be empty.",
            "'name' must be between 2 and 50 characters. You entered 0 characters.",
        ]
    );
}

#[test]
fn missing_optional_value_fails_not_null_and_comparison() {
    let customer = Customer {
        age: None,
        ..valid_customer()
    };
    let result = customer_validator().validate(&customer).unwrap();
    let codes: Vec<&str> = result.failures_for("age").map(|f| f.error_code.as_str()).collect();
    assert_eq!(codes, vec!["not_null", "greater_than_or_equals"]);
    assert_eq!(result.failures()[0].attempted_value, AttemptedValue::Null);
}

#[test]
fn chain_condition_skips_whole_chain() {
    let no_discount = Customer {
        discount: 90,
        ..valid_customer()
    };
    assert_valid!(customer_validator().validate(&no_discount).unwrap());

    let with_discount = Customer {
        has_discount: true,
        ..no_discount
    };
    let result = customer_validator().validate(&with_discount).unwrap();
    assert_messages!(
        result,
        "discount",
        ["'discount' must be between 1 and 50. You entered 90."]
    );
}

#[test]
fn nested_validator_prefixes_keys() {
    let customer = Customer {
        address: Some(Address {
            street: String::new(),
            city: String::new(),
            postcode: "bad!".into(),
        }),
        ..valid_customer()
    };
    let result = customer_validator().validate(&customer).unwrap();
    let keys: Vec<&str> = result.iter().map(|f| f.property_name.as_str()).collect();
    assert_eq!(keys, vec!["address.street", "address.city", "address.postcode"]);
    assert_eq!(result.failures()[1].message, "'city' must not be empty.");
}

#[test]
fn nested_validator_skips_missing_value() {
    let customer = Customer {
        address: None,
        ..valid_customer()
    };
    assert_valid!(customer_validator().validate(&customer).unwrap());
}

#[test]
fn each_rule_keys_elements() {
    let customer = Customer {
        phones: vec!["+44 20 7946 0000".into(), "12".into(), "34".into()],
        ..valid_customer()
    };
    let result = customer_validator().validate(&customer).unwrap();
    assert_no_failure_for!(result, "phones[0]");
    assert_failure_for!(result, "phones[1]");
    assert_failure_for!(result, "phones[2]");
    assert_eq!(
        result.failures()[0].message,
        "The length of 'phones[1]' must be at least 7 characters. You entered 2 characters."
    );
}

#[test]
fn stop_cascade_truncates_chain() {
    let build = |mode: CascadeMode| {
        Validator::builder()
            .rule_for("name", |c: &Customer| c.name.clone())
            .cascade(mode)
            .rule(not_empty())
            .rule(min_length(3))
            .rule(max_length(10))
            .build()
    };
    let customer = Customer {
        name: String::new(),
        ..valid_customer()
    };

    let stop = build(CascadeMode::Stop).validate(&customer).unwrap();
    assert_eq!(stop.len(), 1);
    assert_eq!(stop.failures()[0].error_code, "not_empty");

    let go_on = build(CascadeMode::Continue).validate(&customer).unwrap();
    assert_eq!(go_on.len(), 2);
}

#[test]
fn validator_default_cascade_and_run_override() {
    let validator = Validator::builder()
        .rule_cascade(CascadeMode::Stop)
        .rule_for("name", |c: &Customer| c.name.clone())
        .rule(not_empty())
        .rule(min_length(3))
        .build();
    let customer = Customer {
        name: String::new(),
        ..valid_customer()
    };

    assert_eq!(validator.validate(&customer).unwrap().len(), 1);
    let forced = validator
        .validate_with(&customer, |o| {
            o.cascade(CascadeMode::Continue);
        })
        .unwrap();
    assert_eq!(forced.len(), 2);
}

#[test]
fn include_properties_restricts_run() {
    let customer = Customer {
        name: String::new(),
        email: String::new(),
        address: Some(Address {
            street: String::new(),
            city: String::new(),
            postcode: "SW1Y 4JH".into(),
        }),
        ..valid_customer()
    };
    let validator = customer_validator();

    let only_email = validator
        .validate_with(&customer, |o| {
            o.include_property("email");
        })
        .unwrap();
    assert!(only_email.iter().all(|f| f.property_name == "email"));
    assert_eq!(only_email.len(), 2);

    let only_city = validator
        .validate_with(&customer, |o| {
            o.include_property("address.city");
        })
        .unwrap();
    assert_eq!(only_city.len(), 1);
    assert_failure_for!(only_city, "address.city");
}

#[test]
fn rule_sets_select_chains() {
    let validator = Validator::builder()
        .rule_for("name", |c: &Customer| c.name.clone())
        .rule(not_empty())
        .rule_set("contact", |b| {
            b.rule_for("email", |c: &Customer| c.email.clone())
                .rule(not_empty())
                .rule_for_each("phones", |c: &Customer| c.phones.clone())
                .rule(not_empty())
        })
        .build();
    let customer = Customer {
        name: String::new(),
        email: String::new(),
        phones: vec![String::new()],
        ..valid_customer()
    };

    let default = validator.validate(&customer).unwrap();
    assert_eq!(default.len(), 1);
    assert_eq!(default.rule_sets_executed(), ["default".to_string()]);

    let contact = validator
        .validate_with(&customer, |o| {
            o.rule_set("contact");
        })
        .unwrap();
    assert_eq!(contact.len(), 2);
    assert_no_failure_for!(contact, "name");

    let everything = validator
        .validate_with(&customer, |o| {
            o.all_rule_sets();
        })
        .unwrap();
    assert_eq!(everything.len(), 3);

    let both = validator
        .validate_with(&customer, |o| {
            o.rule_set("default").rule_set("contact");
        })
        .unwrap();
    assert_eq!(both.len(), 3);
    assert_eq!(both.rule_sets_executed(), ["default".to_string(), "contact".to_string()]);
}

#[test]
fn warnings_do_not_invalidate() {
    let validator = Validator::builder()
        .rule_for("name", |c: &Customer| c.name.clone())
        .with_severity(Severity::Warning)
        .rule(max_length(5))
        .rule_for("email", |c: &Customer| c.email.clone())
        .rule(not_empty().with_severity(Severity::Info))
        .build();
    let customer = Customer {
        email: String::new(),
        ..valid_customer()
    };

    let result = validator.validate(&customer).unwrap();
    assert_eq!(result.len(), 2);
    assert!(result.is_valid());
    assert_eq!(result.errors().count(), 0);

    let stricter = Validator::builder()
        .include(&validator)
        .rule_for("age", |c: &Customer| c.age)
        .rule(greater_than(100))
        .build();
    assert!(!stricter.validate(&customer).unwrap().is_valid());
}

#[test]
fn custom_codes_feed_errors_by_code() {
    let validator = Validator::builder()
        .rule_for("email", |c: &Customer| c.email.clone())
        .with_error_code("required")
        .rule(not_empty())
        .rule(
            matches(Regex::new("@").unwrap())
                .with_error_code("email")
                .with_message("Enter a valid email."),
        )
        .build();
    let customer = Customer {
        email: String::new(),
        ..valid_customer()
    };

    let result = validator.validate(&customer).unwrap();
    let errors = result.errors_by_code("email");
    assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["required", "email"]);
    assert_eq!(errors["email"], "Enter a valid email.");
}

#[test]
fn cross_property_comparison() {
    #[derive(Debug)]
    struct Booking {
        check_in: u32,
        check_out: u32,
        password: String,
        confirm: String,
    }

    let validator = Validator::builder()
        .rule_for("check_out", |b: &Booking| b.check_out)
        .rule(greater_than_property("check_in", |b: &Booking| b.check_in))
        .rule_for("confirm", |b: &Booking| b.confirm.clone())
        .with_name("Password confirmation")
        .rule(equals_property("password", |b: &Booking| b.password.clone()))
        .build();

    let booking = Booking {
        check_in: 10,
        check_out: 9,
        password: "hunter2".into(),
        confirm: "hunter3".into(),
    };
    let result = validator.validate(&booking).unwrap();
    assert_messages!(result, "check_out", ["'check_out' must be greater than '10'."]);
    assert_messages!(
        result,
        "confirm",
        ["'Password confirmation' must be equal to 'hunter2'."]
    );
}

#[test]
fn message_fn_output_is_not_reformatted() {
    let validator = Validator::builder()
        .rule_for("name", |c: &Customer| c.name.clone())
        .with_message_fn(|name: &String, c: &Customer| {
            format!("{name} ({}) is too long for {{maxLength}}", c.email)
        })
        .rule(max_length(4))
        .build();

    let result = validator.validate(&valid_customer()).unwrap();
    assert_messages!(
        result,
        "name",
        ["Ada Lovelace (ada@example.com) is too long for {maxLength}"]
    );
}

#[test]
fn repeated_validation_is_idempotent() {
    let validator = customer_validator();
    let customer = Customer {
        name: String::new(),
        phones: vec!["1".into()],
        ..valid_customer()
    };
    let first = validator.validate(&customer).unwrap();
    let second = validator.validate(&customer).unwrap();
    assert_eq!(first, second);
}

#[test]
fn shared_validator_across_threads() {
    let validator = Arc::new(customer_validator());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = Arc::clone(&validator);
            std::thread::spawn(move || {
                let customer = Customer {
                    age: Some(10 + i * 10),
                    ..valid_customer()
                };
                validator.validate(&customer).unwrap().is_valid()
            })
        })
        .collect();
    let outcomes: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(outcomes, vec![false, true, true, true]);
}

#[test]
fn ensure_valid_wraps_result() {
    let validator = customer_validator();
    assert!(validator.ensure_valid(&valid_customer()).is_ok());

    let err = validator
        .ensure_valid(&Customer {
            name: String::new(),
            ..valid_customer()
        })
        .unwrap_err();
    let result = err.result().expect("invalid result");
    assert_failure_for!(result.clone(), "name");
    assert!(err.to_string().starts_with("validation failed:\n'name' must not be empty."));
}
