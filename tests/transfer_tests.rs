use racika_ledger::domain::account::Balance;
use racika_ledger::error::LedgerError;
use rust_decimal_macros::dec;
use std::sync::Arc;

mod common;

#[tokio::test]
async fn test_transfer_conservation() {
    let engine = common::engine();
    let a = common::seed(&engine, 1, "111111111", "Alice Example", dec!(100.0)).await;
    let b = common::seed(&engine, 2, "222222222", "Bob Example", dec!(20.0)).await;

    let funds = engine.transfer_money(&a, &b, dec!(30.0)).await.unwrap();
    assert_eq!(funds, Balance::new(dec!(70.0)));

    // Sum across the pair is preserved.
    let a_funds = engine.profile(&a).await.unwrap().funds;
    let b_funds = engine.profile(&b).await.unwrap().funds;
    assert_eq!(a_funds + b_funds, Balance::new(dec!(120.0)));
}

#[tokio::test]
async fn test_failed_transfer_leaves_balances_unchanged() {
    let engine = common::engine();
    let a = common::seed(&engine, 1, "111111111", "Alice Example", dec!(10.0)).await;
    let b = common::seed(&engine, 2, "222222222", "Bob Example", dec!(20.0)).await;

    let result = engine.transfer_money(&a, &b, dec!(10.01)).await;
    assert!(matches!(result, Err(LedgerError::InsufficientFunds(_))));

    assert_eq!(engine.profile(&a).await.unwrap().funds, Balance::new(dec!(10.0)));
    assert_eq!(engine.profile(&b).await.unwrap().funds, Balance::new(dec!(20.0)));
}

#[tokio::test]
async fn test_concurrent_transfers_exactly_one_wins() {
    let engine = Arc::new(common::engine());
    let a = common::seed(&engine, 1, "111111111", "Alice Example", dec!(10.0)).await;
    let b = common::seed(&engine, 2, "222222222", "Bob Example", dec!(0)).await;

    let first = {
        let engine = Arc::clone(&engine);
        let (a, b) = (a.clone(), b.clone());
        tokio::spawn(async move { engine.transfer_money(&a, &b, dec!(10.0)).await })
    };
    let second = {
        let engine = Arc::clone(&engine);
        let (a, b) = (a.clone(), b.clone());
        tokio::spawn(async move { engine.transfer_money(&a, &b, dec!(10.0)).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one transfer must win");
    assert!(results.iter().any(|r| matches!(
        r,
        Err(LedgerError::InsufficientFunds(_))
    )));

    // No silent double-debit.
    assert_eq!(engine.profile(&a).await.unwrap().funds, Balance::ZERO);
    assert_eq!(engine.profile(&b).await.unwrap().funds, Balance::new(dec!(10.0)));
}

#[tokio::test]
async fn test_balances_never_go_negative() {
    let engine = common::engine();
    let a = common::seed(&engine, 1, "111111111", "Alice Example", dec!(5.0)).await;
    let b = common::seed(&engine, 2, "222222222", "Bob Example", dec!(0)).await;

    for amount in [dec!(6.0), dec!(100.0)] {
        let _ = engine.transfer_money(&a, &b, amount).await;
        let account = engine.profile(&a).await.unwrap();
        assert!(account.funds >= Balance::ZERO);
        assert!(account.savings >= Balance::ZERO);
    }
}
