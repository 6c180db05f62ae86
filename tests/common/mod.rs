use racika_ledger::application::engine::LedgerEngine;
use racika_ledger::domain::account::{Account, CardNumber};
use racika_ledger::infrastructure::in_memory::{
    InMemoryAccountStore, InMemoryActivityStore, InMemoryRequestStore,
};
use rust_decimal::Decimal;
use std::sync::Arc;

pub fn engine() -> LedgerEngine {
    LedgerEngine::new(
        Arc::new(InMemoryAccountStore::new()),
        Arc::new(InMemoryRequestStore::new()),
        Arc::new(InMemoryActivityStore::new()),
    )
}

pub async fn seed(engine: &LedgerEngine, id: u64, card: &str, name: &str, funds: Decimal) -> CardNumber {
    let card = CardNumber::from(card);
    engine
        .open_account(Account::new(id, card.clone(), name, funds))
        .await
        .expect("Failed to seed account");
    card
}
