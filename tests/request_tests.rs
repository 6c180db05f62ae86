use racika_ledger::domain::account::Balance;
use racika_ledger::error::LedgerError;
use rust_decimal_macros::dec;
use std::sync::Arc;

mod common;

#[tokio::test]
async fn test_request_accept_lifecycle() {
    let engine = common::engine();
    let payer = common::seed(&engine, 1, "111111111", "Payer Person", dec!(50.0)).await;
    let asker = common::seed(&engine, 2, "222222222", "Asker Person", dec!(0)).await;

    let request = engine.request_payment(&payer, &asker, dec!(20.0)).await.unwrap();
    assert_eq!(request.requester_name, "Asker Person");

    let pending = engine.get_requests(&payer).await.unwrap();
    assert_eq!(pending.len(), 1);

    engine.accept_request(request.request_id).await.unwrap();
    assert!(engine.get_requests(&payer).await.unwrap().is_empty());
    assert_eq!(engine.profile(&payer).await.unwrap().funds, Balance::new(dec!(30.0)));
    assert_eq!(engine.profile(&asker).await.unwrap().funds, Balance::new(dec!(20.0)));
}

#[tokio::test]
async fn test_accept_with_insufficient_payer_keeps_request_pending() {
    let engine = common::engine();
    let payer = common::seed(&engine, 1, "111111111", "Payer Person", dec!(5.0)).await;
    let asker = common::seed(&engine, 2, "222222222", "Asker Person", dec!(0)).await;

    let request = engine.request_payment(&payer, &asker, dec!(20.0)).await.unwrap();

    let result = engine.accept_request(request.request_id).await;
    assert!(matches!(result, Err(LedgerError::InsufficientFunds(_))));

    // Still listed for the payer; balances untouched.
    let pending = engine.get_requests(&payer).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].request_id, request.request_id);
    assert_eq!(engine.profile(&payer).await.unwrap().funds, Balance::new(dec!(5.0)));

    // A subsequent reject resolves and removes it.
    engine.delete_request(request.request_id).await.unwrap();
    assert!(engine.get_requests(&payer).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_requests_get_distinct_monotonic_ids() {
    let engine = common::engine();
    let payer = common::seed(&engine, 1, "111111111", "Payer Person", dec!(50.0)).await;
    let asker = common::seed(&engine, 2, "222222222", "Asker Person", dec!(0)).await;

    let mut last_id = 0;
    for _ in 0..3 {
        let request = engine.request_payment(&payer, &asker, dec!(10.0)).await.unwrap();
        assert!(request.request_id > last_id);
        last_id = request.request_id;
    }
    assert_eq!(engine.get_requests(&payer).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_concurrent_accept_and_reject_resolve_exactly_once() {
    for _ in 0..20 {
        let engine = Arc::new(common::engine());
        let payer = common::seed(&engine, 1, "111111111", "Payer Person", dec!(100.0)).await;
        let asker = common::seed(&engine, 2, "222222222", "Asker Person", dec!(0)).await;

        let request = engine.request_payment(&payer, &asker, dec!(10.0)).await.unwrap();

        let accept = {
            let engine = Arc::clone(&engine);
            let id = request.request_id;
            tokio::spawn(async move { engine.accept_request(id).await })
        };
        let reject = {
            let engine = Arc::clone(&engine);
            let id = request.request_id;
            tokio::spawn(async move { engine.delete_request(id).await })
        };

        let accept_result = accept.await.unwrap();
        let reject_result = reject.await.unwrap();

        // Exactly one wins; the loser observes RequestNotFound.
        assert!(accept_result.is_ok() ^ reject_result.is_ok());
        if accept_result.is_ok() {
            assert!(matches!(reject_result, Err(LedgerError::RequestNotFound(_))));
            assert_eq!(
                engine.profile(&asker).await.unwrap().funds,
                Balance::new(dec!(10.0))
            );
        } else {
            assert!(matches!(accept_result, Err(LedgerError::RequestNotFound(_))));
            assert_eq!(engine.profile(&asker).await.unwrap().funds, Balance::ZERO);
        }
        assert!(engine.get_requests(&payer).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_unknown_request_id() {
    let engine = common::engine();
    assert!(matches!(
        engine.accept_request(999).await,
        Err(LedgerError::RequestNotFound(999))
    ));
    assert!(matches!(
        engine.delete_request(999).await,
        Err(LedgerError::RequestNotFound(999))
    ));
}
