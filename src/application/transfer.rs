use super::ledger::{AccountLedger, Adjustment};
use crate::domain::account::{Amount, Balance, CardNumber};
use crate::domain::activity::{EarningRecord, SpendingRecord};
use crate::domain::ports::ActivityStoreRef;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// Report category attached to the sender's side of a transfer.
pub const TRANSFER_CATEGORY: &str = "Transfer";

/// Moves funds atomically between two accounts identified by card number.
pub struct TransferEngine {
    accounts: Arc<AccountLedger>,
    activity: ActivityStoreRef,
}

impl TransferEngine {
    pub fn new(accounts: Arc<AccountLedger>, activity: ActivityStoreRef) -> Self {
        Self { accounts, activity }
    }

    /// Debits `from` and credits `to` by `amount` as one atomic step, and
    /// returns the sender's updated funds.
    ///
    /// Self-transfers and non-positive amounts fail with `InvalidTransfer`;
    /// a missing account with `AccountNotFound`; a debit that would go
    /// negative with `InsufficientFunds`. On any failure neither side is
    /// mutated.
    pub async fn transfer(
        &self,
        from: &CardNumber,
        to: &CardNumber,
        amount: Decimal,
    ) -> Result<Balance> {
        if from == to {
            return Err(LedgerError::InvalidTransfer(
                "sender and recipient must differ".to_string(),
            ));
        }
        let amount = Amount::new(amount).ok_or_else(|| {
            LedgerError::InvalidTransfer("transfer amount must be positive".to_string())
        })?;

        let (sender, _receiver) = self
            .accounts
            .adjust_pair(
                Adjustment::debit(from.clone(), amount.value()),
                Adjustment::credit(to.clone(), amount.value()),
            )
            .await?;

        info!(%from, %to, %amount, "transfer committed");
        self.activity
            .record_spending(SpendingRecord::new(
                from.clone(),
                TRANSFER_CATEGORY,
                amount.value(),
            ))
            .await?;
        self.activity
            .record_earning(EarningRecord::new(
                to.clone(),
                from.to_string(),
                amount.value(),
            ))
            .await?;

        Ok(sender.funds)
    }
}
