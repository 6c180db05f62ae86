use crate::domain::account::{Account, Balance, CardNumber};
use crate::domain::ports::AccountStoreRef;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

/// Lazily-populated registry of per-key async locks.
///
/// The outer `std::sync::Mutex` only guards the map itself and is never held
/// across an await point; the per-key `tokio::sync::Mutex` is what serializes
/// the actual work.
pub(crate) struct LockTable<K> {
    entries: StdMutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> LockTable<K> {
    pub fn new() -> Self {
        Self {
            entries: StdMutex::new(HashMap::new()),
        }
    }

    /// Returns the lock guarding `key`, creating it on first use.
    pub fn entry(&self, key: &K) -> Arc<Mutex<()>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// A funds/savings delta pair addressed to one account.
#[derive(Debug, Clone)]
pub struct Adjustment {
    pub card: CardNumber,
    pub funds_delta: Decimal,
    pub savings_delta: Decimal,
}

impl Adjustment {
    pub fn debit(card: CardNumber, amount: Decimal) -> Self {
        Self {
            card,
            funds_delta: -amount,
            savings_delta: Decimal::ZERO,
        }
    }

    pub fn credit(card: CardNumber, amount: Decimal) -> Self {
        Self {
            card,
            funds_delta: amount,
            savings_delta: Decimal::ZERO,
        }
    }
}

/// Single source of truth for balances.
///
/// Wraps the storage port with a per-card lock table so that every mutation of
/// one account is serialized, while reads used purely for display stay
/// lock-free. Updates become visible to other callers only after the full
/// atomic step has been persisted.
pub struct AccountLedger {
    store: AccountStoreRef,
    locks: LockTable<CardNumber>,
}

impl AccountLedger {
    pub fn new(store: AccountStoreRef) -> Self {
        Self {
            store,
            locks: LockTable::new(),
        }
    }

    async fn load(&self, card: &CardNumber) -> Result<Account> {
        self.store
            .get(card)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(card.to_string()))
    }

    /// Display read; not serialized against writers.
    pub async fn get(&self, card: &CardNumber) -> Result<Account> {
        self.load(card).await
    }

    pub async fn find_by_user(&self, user_id: u64) -> Result<Account> {
        self.store
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(format!("user {user_id}")))
    }

    pub async fn all(&self) -> Result<Vec<Account>> {
        self.store.all().await
    }

    /// Seeds a new account. Identity, card issuance and format validation
    /// happen at account opening upstream; the ledger only records the
    /// opening position.
    pub async fn insert(&self, account: Account) -> Result<()> {
        self.store.store(account).await
    }

    /// The single-account mutator. Applies the delta pair atomically with
    /// respect to other mutations of the same card; fails with
    /// `InsufficientFunds` and no effect if either resulting balance would go
    /// negative.
    pub async fn adjust(
        &self,
        card: &CardNumber,
        funds_delta: Decimal,
        savings_delta: Decimal,
    ) -> Result<Account> {
        let lock = self.locks.entry(card);
        let _guard = lock.lock().await;

        let mut account = self.load(card).await?;
        account.apply(funds_delta, savings_delta)?;
        self.store.store(account.clone()).await?;
        Ok(account)
    }

    /// Applies two adjustments as one atomic step: both land or neither is
    /// persisted. The two cards must differ.
    ///
    /// Locks are acquired in ascending card order, so two transfers moving
    /// funds in opposite directions between the same pair cannot deadlock.
    pub async fn adjust_pair(
        &self,
        first: Adjustment,
        second: Adjustment,
    ) -> Result<(Account, Account)> {
        debug_assert_ne!(first.card, second.card);
        let (lo, hi) = if first.card <= second.card {
            (&first.card, &second.card)
        } else {
            (&second.card, &first.card)
        };
        let lo_lock = self.locks.entry(lo);
        let hi_lock = self.locks.entry(hi);
        let _lo_guard = lo_lock.lock().await;
        let _hi_guard = hi_lock.lock().await;

        let mut first_account = self.load(&first.card).await?;
        let mut second_account = self.load(&second.card).await?;
        first_account.apply(first.funds_delta, first.savings_delta)?;
        second_account.apply(second.funds_delta, second.savings_delta)?;
        self.store.store(first_account.clone()).await?;
        self.store.store(second_account.clone()).await?;
        Ok((first_account, second_account))
    }

    /// Serialized settings mutator for the round-up toggle and goal.
    pub async fn set_round_up(
        &self,
        card: &CardNumber,
        enabled: bool,
        goal: Decimal,
    ) -> Result<Account> {
        if goal < Decimal::ZERO {
            return Err(LedgerError::InvalidRequest(
                "savings goal must not be negative".to_string(),
            ));
        }
        let lock = self.locks.entry(card);
        let _guard = lock.lock().await;

        let mut account = self.load(card).await?;
        account.round_up_enabled = enabled;
        account.savings_goal = Balance::new(goal);
        self.store.store(account.clone()).await?;
        Ok(account)
    }
}
