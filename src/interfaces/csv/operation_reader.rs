use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// The kind of one operation-log row.
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Seed an account: `card`, `id` (user id), `amount` (opening funds),
    /// `note` (full name).
    Open,
    /// `card` (sender), `target` (receiver), `amount`.
    Transfer,
    /// `card` (requester), `target` (payer), `amount`.
    Request,
    /// `id` (request id).
    Accept,
    /// `id` (request id).
    Reject,
    /// `card`, `amount`, `note` (category).
    Spend,
    /// `card`, `amount` (goal), `note` (`on` or `off`).
    Roundup,
}

/// One row of the operation log driven through the engine by the CLI.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Operation {
    pub op: OperationKind,
    pub card: Option<String>,
    pub target: Option<String>,
    pub amount: Option<Decimal>,
    pub id: Option<u64>,
    pub note: Option<String>,
}

/// Reads operations from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<Operation>`,
/// handling whitespace trimming and flexible record lengths so large logs
/// can be processed in a streaming fashion.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    /// Creates a new `OperationReader` from any `Read` source (e.g. File,
    /// Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes operations.
    pub fn operations(self) -> impl Iterator<Item = Result<Operation>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
