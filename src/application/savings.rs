use super::ledger::AccountLedger;
use crate::domain::account::{Amount, Balance, CardNumber};
use crate::domain::activity::{SavingsRecord, SpendingRecord};
use crate::domain::ports::ActivityStoreRef;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::debug;

/// Tiered round-up rule mapping a spend amount to a savings contribution.
///
/// Purchases strictly under the threshold contribute the flat minor amount,
/// purchases at or above it the flat major amount. Total and side-effect
/// free; never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundUpPolicy {
    pub threshold: Decimal,
    pub minor: Decimal,
    pub major: Decimal,
}

impl Default for RoundUpPolicy {
    fn default() -> Self {
        Self {
            threshold: dec!(50),
            minor: dec!(1),
            major: dec!(5),
        }
    }
}

impl RoundUpPolicy {
    pub fn contribution(&self, amount: Decimal) -> Decimal {
        if amount < self.threshold {
            self.minor
        } else {
            self.major
        }
    }
}

/// Applies simulated purchases against an account.
pub struct SpendingSimulator {
    accounts: Arc<AccountLedger>,
    activity: ActivityStoreRef,
    policy: RoundUpPolicy,
}

impl SpendingSimulator {
    pub fn new(accounts: Arc<AccountLedger>, activity: ActivityStoreRef) -> Self {
        Self::with_policy(accounts, activity, RoundUpPolicy::default())
    }

    pub fn with_policy(
        accounts: Arc<AccountLedger>,
        activity: ActivityStoreRef,
        policy: RoundUpPolicy,
    ) -> Self {
        Self {
            accounts,
            activity,
            policy,
        }
    }

    /// Debits `amount` from the account's funds and, if round-up is enabled,
    /// moves the policy contribution from the reduced funds into savings.
    ///
    /// The purchase debit is authoritative: `InsufficientFunds` only when the
    /// base amount itself cannot be covered. The round-up is best-effort and
    /// skipped silently when the remaining funds cannot also cover it.
    /// Returns the account's funds after both steps.
    pub async fn spend(
        &self,
        card: &CardNumber,
        amount: Decimal,
        category: &str,
    ) -> Result<Balance> {
        let amount = Amount::new(amount).ok_or_else(|| {
            LedgerError::InvalidSpend("spend amount must be positive".to_string())
        })?;

        let debited = self
            .accounts
            .adjust(card, -amount.value(), Decimal::ZERO)
            .await?;
        let mut funds = debited.funds;

        if debited.round_up_enabled {
            let contribution = self.policy.contribution(amount.value());
            match self.accounts.adjust(card, -contribution, contribution).await {
                Ok(account) => {
                    funds = account.funds;
                    self.activity
                        .record_saving(SavingsRecord::new(card.clone(), category, contribution))
                        .await?;
                }
                Err(LedgerError::InsufficientFunds(_)) => {
                    debug!(%card, "round-up skipped, purchase exhausted funds");
                }
                Err(e) => return Err(e),
            }
        }

        self.activity
            .record_spending(SpendingRecord::new(card.clone(), category, amount.value()))
            .await?;
        Ok(funds)
    }
}
