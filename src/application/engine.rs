use super::ledger::AccountLedger;
use super::requests::RequestBroker;
use super::savings::SpendingSimulator;
use super::transfer::TransferEngine;
use crate::domain::account::{Account, Balance, CardNumber};
use crate::domain::activity::{EarningRecord, SavingsRecord, SpendingRecord};
use crate::domain::ports::{AccountStoreRef, ActivityStoreRef, RequestStoreRef};
use crate::domain::request::PaymentRequest;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// Round-up configuration of one account, as read and written by the
/// savings-settings boundary operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsSettings {
    pub round_up_enabled: bool,
    pub goal: Balance,
}

/// The entry point an authenticated boundary drives.
///
/// Owns the component graph over shared storage handles and maps one-to-one
/// onto the boundary's logical operations. Token validation happens upstream;
/// the engine only ever sees already-resolved parameters.
pub struct LedgerEngine {
    accounts: Arc<AccountLedger>,
    transfers: Arc<TransferEngine>,
    requests: RequestBroker,
    spending: SpendingSimulator,
    activity: ActivityStoreRef,
}

impl LedgerEngine {
    pub fn new(
        accounts: AccountStoreRef,
        requests: RequestStoreRef,
        activity: ActivityStoreRef,
    ) -> Self {
        let ledger = Arc::new(AccountLedger::new(accounts));
        let transfers = Arc::new(TransferEngine::new(
            Arc::clone(&ledger),
            Arc::clone(&activity),
        ));
        let broker = RequestBroker::new(requests, Arc::clone(&transfers), Arc::clone(&ledger));
        let spending = SpendingSimulator::new(Arc::clone(&ledger), Arc::clone(&activity));
        Self {
            accounts: ledger,
            transfers,
            requests: broker,
            spending,
            activity,
        }
    }

    /// Seeds a freshly opened account. Identity and card issuance belong to
    /// the registration flow upstream.
    pub async fn open_account(&self, account: Account) -> Result<()> {
        self.accounts.insert(account).await
    }

    /// Snapshot of one account (name, card, funds, savings) for the profile
    /// view.
    pub async fn profile(&self, card: &CardNumber) -> Result<Account> {
        self.accounts.get(card).await
    }

    /// Moves `amount` from `from` to `to`; returns the sender's updated funds.
    pub async fn transfer_money(
        &self,
        from: &CardNumber,
        to: &CardNumber,
        amount: Decimal,
    ) -> Result<Balance> {
        self.transfers.transfer(from, to, amount).await
    }

    /// Creates a pending payment request addressed to `recipient`.
    pub async fn request_payment(
        &self,
        recipient: &CardNumber,
        requester: &CardNumber,
        amount: Decimal,
    ) -> Result<PaymentRequest> {
        self.requests.create_request(requester, recipient, amount).await
    }

    /// Pending requests addressed to `card`.
    pub async fn get_requests(&self, card: &CardNumber) -> Result<Vec<PaymentRequest>> {
        self.requests.pending_for(card).await
    }

    /// Accepts a request, transferring the amount from the payer to the
    /// requester. The request survives a failed transfer.
    pub async fn accept_request(&self, request_id: u64) -> Result<()> {
        self.requests.accept(request_id).await
    }

    /// Rejects a request without moving funds. (Cleanup after a successful
    /// accept is internal to `accept_request`.)
    pub async fn delete_request(&self, request_id: u64) -> Result<()> {
        self.requests.reject(request_id).await
    }

    /// Applies a simulated purchase; returns the remaining funds.
    pub async fn spend_money(
        &self,
        card: &CardNumber,
        amount: Decimal,
        category: &str,
    ) -> Result<Balance> {
        self.spending.spend(card, amount, category).await
    }

    pub async fn get_savings_settings(&self, user_id: u64) -> Result<SavingsSettings> {
        let account = self.accounts.find_by_user(user_id).await?;
        Ok(SavingsSettings {
            round_up_enabled: account.round_up_enabled,
            goal: account.savings_goal,
        })
    }

    pub async fn update_savings_settings(
        &self,
        user_id: u64,
        round_up_enabled: bool,
        goal: Decimal,
    ) -> Result<()> {
        let account = self.accounts.find_by_user(user_id).await?;
        self.accounts
            .set_round_up(&account.card_number, round_up_enabled, goal)
            .await?;
        Ok(())
    }

    /// Round-up settings addressed by card, for callers that only hold the
    /// public transfer address.
    pub async fn set_round_up(
        &self,
        card: &CardNumber,
        round_up_enabled: bool,
        goal: Decimal,
    ) -> Result<Account> {
        self.accounts.set_round_up(card, round_up_enabled, goal).await
    }

    /// Monthly spendings report feed; `month` is 1-12.
    pub async fn spendings(&self, user_id: u64, month: u32) -> Result<Vec<SpendingRecord>> {
        let account = self.accounts.find_by_user(user_id).await?;
        self.activity.spendings(&account.card_number, month).await
    }

    /// Monthly earnings report feed; `month` is 1-12.
    pub async fn earnings(&self, user_id: u64, month: u32) -> Result<Vec<EarningRecord>> {
        let account = self.accounts.find_by_user(user_id).await?;
        self.activity.earnings(&account.card_number, month).await
    }

    /// History of round-up contributions for the savings activity list.
    pub async fn savings_activity(&self, user_id: u64) -> Result<Vec<SavingsRecord>> {
        let account = self.accounts.find_by_user(user_id).await?;
        self.activity.savings_activity(&account.card_number).await
    }

    /// Final state of every account, for the harness report.
    pub async fn all_accounts(&self) -> Result<Vec<Account>> {
        self.accounts.all().await
    }
}
