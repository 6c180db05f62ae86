use super::account::{Amount, CardNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pending ask for money from one account to another.
///
/// Requests are immutable once created: amount and parties never change.
/// Resolution (accept or reject) removes the request from the store instead
/// of flipping a state flag, so existence implies Pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub request_id: u64,
    pub requester_card: CardNumber,
    pub requester_name: String,
    /// The payer: the account the ask is addressed to.
    pub recipient_card: CardNumber,
    pub amount: Amount,
    pub created_at: DateTime<Utc>,
}
