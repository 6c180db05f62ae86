use super::ledger::{AccountLedger, LockTable};
use super::transfer::TransferEngine;
use crate::domain::account::{Account, Amount, CardNumber};
use crate::domain::ports::RequestStoreRef;
use crate::domain::request::PaymentRequest;
use crate::error::{LedgerError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// Manages the payment-request lifecycle between two parties.
///
/// A request exists only while Pending: acceptance transfers the funds and
/// deletes it, rejection deletes it without moving money. Per-request-id
/// mutual exclusion guarantees a concurrent accept and reject resolve to
/// exactly one winner; the loser observes `RequestNotFound`.
pub struct RequestBroker {
    requests: RequestStoreRef,
    transfers: Arc<TransferEngine>,
    accounts: Arc<AccountLedger>,
    locks: LockTable<u64>,
}

impl RequestBroker {
    pub fn new(
        requests: RequestStoreRef,
        transfers: Arc<TransferEngine>,
        accounts: Arc<AccountLedger>,
    ) -> Self {
        Self {
            requests,
            transfers,
            accounts,
            locks: LockTable::new(),
        }
    }

    async fn resolve_card(&self, card: &CardNumber, role: &str) -> Result<Account> {
        match self.accounts.get(card).await {
            Ok(account) => Ok(account),
            Err(LedgerError::AccountNotFound(_)) => Err(LedgerError::InvalidRequest(format!(
                "unknown {role} card {card}"
            ))),
            Err(e) => Err(e),
        }
    }

    /// Creates a new pending ask from `requester` addressed to `recipient`
    /// (the payer). The requester's display name is resolved from their
    /// account record.
    ///
    /// Duplicate calls create duplicate requests; the broker does not dedupe.
    pub async fn create_request(
        &self,
        requester: &CardNumber,
        recipient: &CardNumber,
        amount: Decimal,
    ) -> Result<PaymentRequest> {
        let amount = Amount::new(amount).ok_or_else(|| {
            LedgerError::InvalidRequest("request amount must be positive".to_string())
        })?;
        let requester_account = self.resolve_card(requester, "requester").await?;
        self.resolve_card(recipient, "recipient").await?;

        let request = PaymentRequest {
            request_id: self.requests.next_id().await?,
            requester_card: requester.clone(),
            requester_name: requester_account.full_name,
            recipient_card: recipient.clone(),
            amount,
            created_at: Utc::now(),
        };
        self.requests.store(request.clone()).await?;
        info!(id = request.request_id, %requester, %recipient, "payment request created");
        Ok(request)
    }

    /// Pending requests addressed to `recipient`, ordered by ascending id.
    pub async fn pending_for(&self, recipient: &CardNumber) -> Result<Vec<PaymentRequest>> {
        self.requests.pending_for(recipient).await
    }

    /// Accepts a request: the payer transfers the amount to the requester.
    ///
    /// A failed transfer (typically `InsufficientFunds`) does not consume the
    /// acceptance: the request stays Pending and the failure surfaces to the
    /// caller. Only a successful transfer deletes the request.
    pub async fn accept(&self, request_id: u64) -> Result<()> {
        let lock = self.locks.entry(&request_id);
        let _guard = lock.lock().await;

        let request = self
            .requests
            .get(request_id)
            .await?
            .ok_or(LedgerError::RequestNotFound(request_id))?;
        self.transfers
            .transfer(
                &request.recipient_card,
                &request.requester_card,
                request.amount.value(),
            )
            .await?;
        self.requests.remove(request_id).await?;
        info!(id = request_id, "payment request accepted");
        Ok(())
    }

    /// Rejects a request: deletes it without moving funds.
    pub async fn reject(&self, request_id: u64) -> Result<()> {
        let lock = self.locks.entry(&request_id);
        let _guard = lock.lock().await;

        self.requests
            .get(request_id)
            .await?
            .ok_or(LedgerError::RequestNotFound(request_id))?;
        self.requests.remove(request_id).await?;
        info!(id = request_id, "payment request rejected");
        Ok(())
    }
}
