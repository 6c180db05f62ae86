use crate::domain::account::{Account, CardNumber};
use crate::domain::activity::{EarningRecord, SavingsRecord, SpendingRecord};
use crate::domain::ports::{AccountStore, ActivityStore, RequestStore};
use crate::domain::request::PaymentRequest;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use chrono::Datelike;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Column Family for account states.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for pending payment requests.
pub const CF_REQUESTS: &str = "requests";
/// Column Families for the append-only reporting entries.
pub const CF_SPENDINGS: &str = "spendings";
pub const CF_EARNINGS: &str = "earnings";
pub const CF_SAVINGS: &str = "savings";

/// A persistent store implementation using RocksDB.
///
/// One Column Family per entity, JSON-serialized values. Accounts are keyed
/// by card number; requests and reporting entries by big-endian `u64` keys so
/// iteration order is numeric order. Id and sequence counters are re-seeded
/// from the highest persisted key on open.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    next_request_id: Arc<AtomicU64>,
    next_activity_seq: Arc<AtomicU64>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// all required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_ACCOUNTS, CF_REQUESTS, CF_SPENDINGS, CF_EARNINGS, CF_SAVINGS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        let request_seed = last_u64_key(&db, CF_REQUESTS)?;
        let activity_seed = [CF_SPENDINGS, CF_EARNINGS, CF_SAVINGS]
            .into_iter()
            .try_fold(0u64, |acc, name| {
                last_u64_key(&db, name).map(|last| acc.max(last))
            })?;

        Ok(Self {
            db: Arc::new(db),
            next_request_id: Arc::new(AtomicU64::new(request_seed)),
            next_activity_seq: Arc::new(AtomicU64::new(activity_seed)),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        cf_handle(&self.db, name)
    }

    fn append_activity<T: serde::Serialize>(&self, cf_name: &str, record: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let seq = self.next_activity_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let value = serde_json::to_vec(record)?;
        self.db.put_cf(cf, seq.to_be_bytes(), value)?;
        Ok(())
    }

    fn scan_activity<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }
}

fn cf_handle<'a>(db: &'a DB, name: &str) -> Result<&'a rocksdb::ColumnFamily> {
    db.cf_handle(name).ok_or_else(|| {
        LedgerError::Storage(Box::new(std::io::Error::other(format!(
            "{name} column family not found"
        ))))
    })
}

fn last_u64_key(db: &DB, name: &str) -> Result<u64> {
    let cf = cf_handle(db, name)?;
    match db.iterator_cf(cf, IteratorMode::End).next() {
        Some(item) => {
            let (key, _value) = item?;
            let bytes: [u8; 8] = key
                .as_ref()
                .try_into()
                .map_err(|e| LedgerError::Storage(Box::new(std::io::Error::other(format!(
                    "malformed {name} key: {e}"
                )))))?;
            Ok(u64::from_be_bytes(bytes))
        }
        None => Ok(0),
    }
}

#[async_trait]
impl AccountStore for RocksDBStore {
    async fn store(&self, account: Account) -> Result<()> {
        let cf = self.cf(CF_ACCOUNTS)?;
        let value = serde_json::to_vec(&account)?;
        self.db.put_cf(cf, account.card_number.as_str(), value)?;
        Ok(())
    }

    async fn get(&self, card: &CardNumber) -> Result<Option<Account>> {
        let cf = self.cf(CF_ACCOUNTS)?;
        match self.db.get_cf(cf, card.as_str())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn find_by_user(&self, user_id: u64) -> Result<Option<Account>> {
        let cf = self.cf(CF_ACCOUNTS)?;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let account: Account = serde_json::from_slice(&value)?;
            if account.id == user_id {
                return Ok(Some(account));
            }
        }
        Ok(None)
    }

    async fn all(&self) -> Result<Vec<Account>> {
        let cf = self.cf(CF_ACCOUNTS)?;
        let mut accounts = Vec::new();
        // Keys are card numbers, so iteration order is already ascending card.
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            accounts.push(serde_json::from_slice(&value)?);
        }
        Ok(accounts)
    }
}

#[async_trait]
impl RequestStore for RocksDBStore {
    async fn next_id(&self) -> Result<u64> {
        Ok(self.next_request_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    async fn store(&self, request: PaymentRequest) -> Result<()> {
        let cf = self.cf(CF_REQUESTS)?;
        let value = serde_json::to_vec(&request)?;
        self.db.put_cf(cf, request.request_id.to_be_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, request_id: u64) -> Result<Option<PaymentRequest>> {
        let cf = self.cf(CF_REQUESTS)?;
        match self.db.get_cf(cf, request_id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn remove(&self, request_id: u64) -> Result<()> {
        let cf = self.cf(CF_REQUESTS)?;
        self.db.delete_cf(cf, request_id.to_be_bytes())?;
        Ok(())
    }

    async fn pending_for(&self, recipient: &CardNumber) -> Result<Vec<PaymentRequest>> {
        let cf = self.cf(CF_REQUESTS)?;
        let mut pending = Vec::new();
        // Big-endian keys make iteration order ascending request id.
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let request: PaymentRequest = serde_json::from_slice(&value)?;
            if &request.recipient_card == recipient {
                pending.push(request);
            }
        }
        Ok(pending)
    }
}

#[async_trait]
impl ActivityStore for RocksDBStore {
    async fn record_spending(&self, record: SpendingRecord) -> Result<()> {
        self.append_activity(CF_SPENDINGS, &record)
    }

    async fn record_earning(&self, record: EarningRecord) -> Result<()> {
        self.append_activity(CF_EARNINGS, &record)
    }

    async fn record_saving(&self, record: SavingsRecord) -> Result<()> {
        self.append_activity(CF_SAVINGS, &record)
    }

    async fn spendings(&self, card: &CardNumber, month: u32) -> Result<Vec<SpendingRecord>> {
        let records: Vec<SpendingRecord> = self.scan_activity(CF_SPENDINGS)?;
        Ok(records
            .into_iter()
            .filter(|r| &r.card_number == card && r.timestamp.month() == month)
            .collect())
    }

    async fn earnings(&self, card: &CardNumber, month: u32) -> Result<Vec<EarningRecord>> {
        let records: Vec<EarningRecord> = self.scan_activity(CF_EARNINGS)?;
        Ok(records
            .into_iter()
            .filter(|r| &r.card_number == card && r.timestamp.month() == month)
            .collect())
    }

    async fn savings_activity(&self, card: &CardNumber) -> Result<Vec<SavingsRecord>> {
        let records: Vec<SavingsRecord> = self.scan_activity(CF_SAVINGS)?;
        Ok(records
            .into_iter()
            .filter(|r| &r.card_number == card)
            .collect())
    }
}
