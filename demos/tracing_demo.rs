//! Demonstrates tracing integration with validators
//!
//! Run with: cargo run --example tracing_demo --features tracing

use futures::FutureExt;
use ruleflow::prelude::*;

#[derive(Debug)]
struct Transfer {
    from: String,
    to: String,
    amount: u64,
    memo: Option<String>,
}

#[tokio::main]
async fn main() {
    // Set up tracing subscriber
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    tracing::info!("Starting tracing demo");

    let validator = Validator::builder()
        .rule_for("from", |t: &Transfer| t.from.clone())
        .rule(not_empty())
        .rule_for("to", |t: &Transfer| t.to.clone())
        .rule(not_equals_property("from", |t: &Transfer| t.from.clone()))
        .rule_for("amount", |t: &Transfer| t.amount)
        .rule(greater_than(0))
        .must_async(|amount: &u64, _: &Transfer| {
            let amount = *amount;
            async move {
                tokio::task::yield_now().await;
                amount <= 5_000
            }
            .boxed()
        })
        .rule_for("memo", |t: &Transfer| t.memo.clone())
        .when(|t: &Transfer| t.amount > 1_000)
        .rule(required())
        .build();

    let transfer = Transfer {
        from: "acct-1".into(),
        to: "acct-1".into(),
        amount: 10_000,
        memo: None,
    };

    // The synchronous entry point refuses and logs a warning
    if let Err(e) = validator.validate(&transfer) {
        tracing::error!("Synchronous validation refused: {}", e);
    }

    let result = validator.validate_async(&transfer).await;
    for failure in result.iter() {
        tracing::info!(
            property = %failure.property_name,
            code = %failure.error_code,
            "{}",
            failure.message
        );
    }

    // Leftover override on the last chain is dropped with a warning
    let _ = Validator::builder()
        .rule_for("memo", |t: &Transfer| t.memo.clone())
        .rule(max_length(140))
        .with_severity(Severity::Warning)
        .build();
}
