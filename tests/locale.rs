//! Process-wide locale selection
//!
//! Kept to a single test: the language manager is global, and tests in one
//! binary run concurrently.

use ruleflow::messages::{self, MessageTable};
use ruleflow::prelude::*;
use ruleflow::assert_messages;

struct Account {
    owner: String,
    balance: i64,
}

#[test]
fn locale_switch_changes_default_messages() {
    let validator = Validator::builder()
        .rule_for("owner", |a: &Account| a.owner.clone())
        .rule(not_empty())
        .rule_for("balance", |a: &Account| a.balance)
        .rule(greater_than_or_equals(0))
        .build();
    let pinned = Validator::builder()
        .messages(MessageTable::english())
        .rule_for("owner", |a: &Account| a.owner.clone())
        .rule(not_empty())
        .build();
    let account = Account {
        owner: String::new(),
        balance: -5,
    };

    assert_eq!(messages::locale(), "en");
    assert_messages!(
        validator.validate(&account).unwrap(),
        "owner",
        ["'owner' must not be empty."]
    );

    assert_eq!(
        messages::set_locale("fr"),
        Err(ValidationError::UnknownLocale("fr".into()))
    );
    assert_eq!(messages::locale(), "en");

    messages::register(
        MessageTable::new("fr")
            .with_template(RuleKind::NotEmpty, "'{propertyName}' ne doit pas être vide."),
    );
    messages::set_locale("fr").unwrap();

    let result = validator.validate(&account).unwrap();
    assert_messages!(result, "owner", ["'owner' ne doit pas être vide."]);
    // Kinds without a French template fall back to English.
    assert_messages!(
        result,
        "balance",
        ["'balance' must be greater than or equal to '0'."]
    );
    // A validator with its own table ignores the global locale.
    assert_messages!(
        pinned.validate(&account).unwrap(),
        "owner",
        ["'owner' must not be empty."]
    );

    messages::set_locale("en").unwrap();
    assert_messages!(
        validator.validate(&account).unwrap(),
        "owner",
        ["'owner' must not be empty."]
    );
}
