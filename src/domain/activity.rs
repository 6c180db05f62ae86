use super::account::CardNumber;
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Append-only entry for money leaving an account, used by the monthly
/// spendings report. Never updated or deleted after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingRecord {
    pub card_number: CardNumber,
    /// Day of month, denormalized for the report feed.
    pub day: u32,
    pub category: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl SpendingRecord {
    pub fn new(card_number: CardNumber, category: impl Into<String>, amount: Decimal) -> Self {
        let timestamp = Utc::now();
        Self {
            card_number,
            day: timestamp.day(),
            category: category.into(),
            amount,
            timestamp,
        }
    }
}

/// Append-only entry for money arriving on an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningRecord {
    pub card_number: CardNumber,
    pub day: u32,
    /// Card number of the sending side.
    pub counterparty: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl EarningRecord {
    pub fn new(card_number: CardNumber, counterparty: impl Into<String>, amount: Decimal) -> Self {
        let timestamp = Utc::now();
        Self {
            card_number,
            day: timestamp.day(),
            counterparty: counterparty.into(),
            amount,
            timestamp,
        }
    }
}

/// Append-only entry for a round-up contribution landing in savings, shown
/// as the client's savings activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsRecord {
    pub card_number: CardNumber,
    /// Category of the purchase that triggered the contribution.
    pub category: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl SavingsRecord {
    pub fn new(card_number: CardNumber, category: impl Into<String>, amount: Decimal) -> Self {
        Self {
            card_number,
            category: category.into(),
            amount,
            timestamp: Utc::now(),
        }
    }
}
