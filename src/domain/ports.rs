use super::account::{Account, CardNumber};
use super::activity::{EarningRecord, SavingsRecord, SpendingRecord};
use super::request::PaymentRequest;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage port for account state. Implementations only persist and look up;
/// serialization of mutations is the `AccountLedger`'s job.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn store(&self, account: Account) -> Result<()>;
    async fn get(&self, card: &CardNumber) -> Result<Option<Account>>;
    /// Lookup by the opaque user identity, for the savings-settings boundary
    /// operations which are keyed by user id rather than card number.
    async fn find_by_user(&self, user_id: u64) -> Result<Option<Account>>;
    async fn all(&self) -> Result<Vec<Account>>;
}

/// Storage port for pending payment requests.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Allocates the next unique request id, monotonic within a store
    /// lifetime.
    async fn next_id(&self) -> Result<u64>;
    async fn store(&self, request: PaymentRequest) -> Result<()>;
    async fn get(&self, request_id: u64) -> Result<Option<PaymentRequest>>;
    async fn remove(&self, request_id: u64) -> Result<()>;
    /// Pending requests addressed to `recipient`, ordered by ascending id.
    async fn pending_for(&self, recipient: &CardNumber) -> Result<Vec<PaymentRequest>>;
}

/// Append-only sink and query surface for reporting entries. The core only
/// ever appends; the report feeds are read by the boundary.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn record_spending(&self, record: SpendingRecord) -> Result<()>;
    async fn record_earning(&self, record: EarningRecord) -> Result<()>;
    async fn record_saving(&self, record: SavingsRecord) -> Result<()>;
    /// Spendings of `card` whose timestamp falls in `month` (1-12).
    async fn spendings(&self, card: &CardNumber, month: u32) -> Result<Vec<SpendingRecord>>;
    async fn earnings(&self, card: &CardNumber, month: u32) -> Result<Vec<EarningRecord>>;
    async fn savings_activity(&self, card: &CardNumber) -> Result<Vec<SavingsRecord>>;
}

pub type AccountStoreRef = Arc<dyn AccountStore>;
pub type RequestStoreRef = Arc<dyn RequestStore>;
pub type ActivityStoreRef = Arc<dyn ActivityStore>;
