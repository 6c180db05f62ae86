use crate::domain::account::Account;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct AccountRow<'a> {
    card: &'a str,
    name: &'a str,
    funds: Decimal,
    savings: Decimal,
    goal: Decimal,
    roundup: bool,
}

/// Writes the final account states as CSV.
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(target),
        }
    }

    pub fn write_accounts(&mut self, accounts: Vec<Account>) -> Result<()> {
        for account in &accounts {
            self.writer.serialize(AccountRow {
                card: account.card_number.as_str(),
                name: &account.full_name,
                funds: account.funds.0,
                savings: account.savings.0,
                goal: account.savings_goal.0,
                roundup: account.round_up_enabled,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
