use chrono::{Datelike, Utc};
use racika_ledger::application::savings::RoundUpPolicy;
use racika_ledger::domain::account::Balance;
use racika_ledger::error::LedgerError;
use rust_decimal_macros::dec;

mod common;

#[test]
fn test_round_up_tier_boundaries() {
    let policy = RoundUpPolicy::default();
    assert_eq!(policy.contribution(dec!(49.99)), dec!(1));
    assert_eq!(policy.contribution(dec!(50)), dec!(5));
    assert_eq!(policy.contribution(dec!(50.01)), dec!(5));
}

#[tokio::test]
async fn test_spend_with_round_up_routes_contribution_to_savings() {
    let engine = common::engine();
    let card = common::seed(&engine, 1, "111111111", "Alice Example", dec!(100.0)).await;
    engine.set_round_up(&card, true, dec!(500.0)).await.unwrap();

    let funds = engine.spend_money(&card, dec!(30.0), "Coffee").await.unwrap();
    assert_eq!(funds, Balance::new(dec!(69.0)));

    let account = engine.profile(&card).await.unwrap();
    assert_eq!(account.funds, Balance::new(dec!(69.0)));
    assert_eq!(account.savings, Balance::new(dec!(1.0)));
}

#[tokio::test]
async fn test_spend_without_round_up() {
    let engine = common::engine();
    let card = common::seed(&engine, 1, "111111111", "Alice Example", dec!(100.0)).await;

    let funds = engine.spend_money(&card, dec!(30.0), "Coffee").await.unwrap();
    assert_eq!(funds, Balance::new(dec!(70.0)));
    assert_eq!(engine.profile(&card).await.unwrap().savings, Balance::ZERO);
}

#[tokio::test]
async fn test_round_up_is_best_effort() {
    let engine = common::engine();
    let card = common::seed(&engine, 1, "111111111", "Alice Example", dec!(30.0)).await;
    engine.set_round_up(&card, true, dec!(0)).await.unwrap();

    // The purchase exhausts the funds; the contribution is skipped silently.
    let funds = engine.spend_money(&card, dec!(30.0), "Coffee").await.unwrap();
    assert_eq!(funds, Balance::ZERO);

    let account = engine.profile(&card).await.unwrap();
    assert_eq!(account.funds, Balance::ZERO);
    assert_eq!(account.savings, Balance::ZERO);
}

#[tokio::test]
async fn test_insufficient_funds_for_base_amount() {
    let engine = common::engine();
    let card = common::seed(&engine, 1, "111111111", "Alice Example", dec!(10.0)).await;

    let result = engine.spend_money(&card, dec!(11.0), "Coffee").await;
    assert!(matches!(result, Err(LedgerError::InsufficientFunds(_))));
    assert_eq!(engine.profile(&card).await.unwrap().funds, Balance::new(dec!(10.0)));
}

#[tokio::test]
async fn test_invalid_spend_amount() {
    let engine = common::engine();
    let card = common::seed(&engine, 1, "111111111", "Alice Example", dec!(10.0)).await;

    let result = engine.spend_money(&card, dec!(0), "Coffee").await;
    assert!(matches!(result, Err(LedgerError::InvalidSpend(_))));
}

#[tokio::test]
async fn test_savings_settings_and_activity_feed() {
    let engine = common::engine();
    let card = common::seed(&engine, 9, "111111111", "Alice Example", dec!(200.0)).await;

    engine.update_savings_settings(9, true, dec!(1000.0)).await.unwrap();
    let settings = engine.get_savings_settings(9).await.unwrap();
    assert!(settings.round_up_enabled);
    assert_eq!(settings.goal, Balance::new(dec!(1000.0)));

    engine.spend_money(&card, dec!(4.0), "Coffee").await.unwrap();
    engine.spend_money(&card, dec!(60.0), "Groceries").await.unwrap();

    let activity = engine.savings_activity(9).await.unwrap();
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0].amount, dec!(1));
    assert_eq!(activity[1].amount, dec!(5));

    let month = Utc::now().month();
    let spendings = engine.spendings(9, month).await.unwrap();
    assert_eq!(spendings.len(), 2);
    assert!(spendings.iter().any(|r| r.category == "Groceries"));
}
