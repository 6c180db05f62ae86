use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Represents a monetary value with 4 decimal places precision.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce domain-specific
/// rules and provide type safety for financial calculations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

/// Represents a positive monetary amount for transfers, requests and spends.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    /// Returns `None` unless `value` is strictly positive. Callers map the
    /// rejection onto their own failure kind (`InvalidTransfer`,
    /// `InvalidRequest`, `InvalidSpend`).
    pub fn new(value: Decimal) -> Option<Self> {
        (value > Decimal::ZERO).then_some(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// The public transfer address of an account.
///
/// Nine digits; uniqueness and format are enforced at account opening, which
/// happens outside this core. The ledger treats it as an opaque lookup key.
/// `Ord` is the lock-acquisition order for operations touching two accounts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardNumber(String);

impl CardNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardNumber {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One customer's ledger position.
///
/// `funds` is the primary spendable balance; `savings` is a secondary balance
/// credited by round-up allocations and not directly spendable here. Both are
/// non-negative at all times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque stable identity assigned by the identity subsystem.
    pub id: u64,
    pub card_number: CardNumber,
    pub full_name: String,
    pub funds: Balance,
    pub savings: Balance,
    pub savings_goal: Balance,
    pub round_up_enabled: bool,
}

impl Account {
    pub fn new(id: u64, card_number: CardNumber, full_name: impl Into<String>, funds: Decimal) -> Self {
        Self {
            id,
            card_number,
            full_name: full_name.into(),
            funds: Balance::new(funds),
            savings: Balance::ZERO,
            savings_goal: Balance::ZERO,
            round_up_enabled: false,
        }
    }

    /// Applies a funds/savings delta pair as one step.
    ///
    /// Both resulting balances are computed before either is written; if one
    /// would go negative the account is left untouched and the call fails
    /// with `InsufficientFunds`.
    pub fn apply(&mut self, funds_delta: Decimal, savings_delta: Decimal) -> Result<()> {
        let funds = self.funds.0 + funds_delta;
        let savings = self.savings.0 + savings_delta;
        if funds < Decimal::ZERO || savings < Decimal::ZERO {
            return Err(LedgerError::InsufficientFunds(self.card_number.to_string()));
        }
        self.funds = Balance::new(funds);
        self.savings = Balance::new(savings);
        Ok(())
    }
}
