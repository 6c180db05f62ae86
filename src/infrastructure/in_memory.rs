use crate::domain::account::{Account, CardNumber};
use crate::domain::activity::{EarningRecord, SavingsRecord, SpendingRecord};
use crate::domain::ports::{AccountStore, ActivityStore, RequestStore};
use crate::domain::request::PaymentRequest;
use crate::error::Result;
use async_trait::async_trait;
use chrono::Datelike;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for account state.
///
/// Uses `Arc<RwLock<HashMap>>` to allow shared concurrent access. Ideal for
/// testing or ephemeral runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<CardNumber, Account>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn store(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.card_number.clone(), account);
        Ok(())
    }

    async fn get(&self, card: &CardNumber) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(card).cloned())
    }

    async fn find_by_user(&self, user_id: u64) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.id == user_id).cloned())
    }

    async fn all(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.card_number.cmp(&b.card_number));
        Ok(all)
    }
}

/// A thread-safe in-memory store for pending payment requests.
///
/// Ids come from a process-local monotonic counter, standing in for the
/// autoincrement column a database backend would provide.
#[derive(Default, Clone)]
pub struct InMemoryRequestStore {
    requests: Arc<RwLock<HashMap<u64, PaymentRequest>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn next_id(&self) -> Result<u64> {
        Ok(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    async fn store(&self, request: PaymentRequest) -> Result<()> {
        let mut requests = self.requests.write().await;
        requests.insert(request.request_id, request);
        Ok(())
    }

    async fn get(&self, request_id: u64) -> Result<Option<PaymentRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.get(&request_id).cloned())
    }

    async fn remove(&self, request_id: u64) -> Result<()> {
        let mut requests = self.requests.write().await;
        requests.remove(&request_id);
        Ok(())
    }

    async fn pending_for(&self, recipient: &CardNumber) -> Result<Vec<PaymentRequest>> {
        let requests = self.requests.read().await;
        let mut pending: Vec<PaymentRequest> = requests
            .values()
            .filter(|r| &r.recipient_card == recipient)
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.request_id);
        Ok(pending)
    }
}

/// A thread-safe in-memory sink for the append-only reporting entries.
#[derive(Default, Clone)]
pub struct InMemoryActivityStore {
    spendings: Arc<RwLock<Vec<SpendingRecord>>>,
    earnings: Arc<RwLock<Vec<EarningRecord>>>,
    savings: Arc<RwLock<Vec<SavingsRecord>>>,
}

impl InMemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityStore for InMemoryActivityStore {
    async fn record_spending(&self, record: SpendingRecord) -> Result<()> {
        self.spendings.write().await.push(record);
        Ok(())
    }

    async fn record_earning(&self, record: EarningRecord) -> Result<()> {
        self.earnings.write().await.push(record);
        Ok(())
    }

    async fn record_saving(&self, record: SavingsRecord) -> Result<()> {
        self.savings.write().await.push(record);
        Ok(())
    }

    async fn spendings(&self, card: &CardNumber, month: u32) -> Result<Vec<SpendingRecord>> {
        let spendings = self.spendings.read().await;
        Ok(spendings
            .iter()
            .filter(|r| &r.card_number == card && r.timestamp.month() == month)
            .cloned()
            .collect())
    }

    async fn earnings(&self, card: &CardNumber, month: u32) -> Result<Vec<EarningRecord>> {
        let earnings = self.earnings.read().await;
        Ok(earnings
            .iter()
            .filter(|r| &r.card_number == card && r.timestamp.month() == month)
            .cloned()
            .collect())
    }

    async fn savings_activity(&self, card: &CardNumber) -> Result<Vec<SavingsRecord>> {
        let savings = self.savings.read().await;
        Ok(savings
            .iter()
            .filter(|r| &r.card_number == card)
            .cloned()
            .collect())
    }
}
