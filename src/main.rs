use clap::Parser;
use miette::{IntoDiagnostic, Result};
use racika_ledger::application::engine::LedgerEngine;
use racika_ledger::domain::account::{Account, CardNumber};
use racika_ledger::error::LedgerError;
use racika_ledger::infrastructure::in_memory::{
    InMemoryAccountStore, InMemoryActivityStore, InMemoryRequestStore,
};
use racika_ledger::interfaces::csv::account_writer::AccountWriter;
use racika_ledger::interfaces::csv::operation_reader::{Operation, OperationKind, OperationReader};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operation log CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = build_engine(cli.db_path)?;

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for op_result in reader.operations() {
        match op_result {
            Ok(op) => {
                if let Err(e) = apply(&engine, op).await {
                    eprintln!("Error processing operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Output final account states
    let accounts = engine.all_accounts().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = AccountWriter::new(stdout.lock());
    writer.write_accounts(accounts).into_diagnostic()?;

    Ok(())
}

#[cfg(feature = "storage-rocksdb")]
fn build_engine(db_path: Option<PathBuf>) -> Result<LedgerEngine> {
    use racika_ledger::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            Ok(LedgerEngine::new(
                Arc::new(store.clone()),
                Arc::new(store.clone()),
                Arc::new(store),
            ))
        }
        None => Ok(in_memory_engine()),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn build_engine(db_path: Option<PathBuf>) -> Result<LedgerEngine> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_engine())
}

fn in_memory_engine() -> LedgerEngine {
    LedgerEngine::new(
        Arc::new(InMemoryAccountStore::new()),
        Arc::new(InMemoryRequestStore::new()),
        Arc::new(InMemoryActivityStore::new()),
    )
}

fn required<T>(value: Option<T>, message: &str) -> racika_ledger::error::Result<T> {
    value.ok_or_else(|| LedgerError::InvalidOperation(message.to_string()))
}

async fn apply(engine: &LedgerEngine, op: Operation) -> racika_ledger::error::Result<()> {
    match op.op {
        OperationKind::Open => {
            let card = required(op.card, "open requires a card")?;
            let id = required(op.id, "open requires a user id in the id column")?;
            let name = required(op.note, "open requires a name in the note column")?;
            let funds = op.amount.unwrap_or(Decimal::ZERO);
            if funds < Decimal::ZERO {
                return Err(LedgerError::InvalidOperation(
                    "opening funds must not be negative".to_string(),
                ));
            }
            engine
                .open_account(Account::new(id, CardNumber::new(card), name, funds))
                .await
        }
        OperationKind::Transfer => {
            let from = required(op.card, "transfer requires a sender card")?;
            let to = required(op.target, "transfer requires a target card")?;
            let amount = required(op.amount, "transfer requires an amount")?;
            engine
                .transfer_money(&CardNumber::new(from), &CardNumber::new(to), amount)
                .await?;
            Ok(())
        }
        OperationKind::Request => {
            let requester = required(op.card, "request requires a requester card")?;
            let recipient = required(op.target, "request requires a target card")?;
            let amount = required(op.amount, "request requires an amount")?;
            engine
                .request_payment(
                    &CardNumber::new(recipient),
                    &CardNumber::new(requester),
                    amount,
                )
                .await?;
            Ok(())
        }
        OperationKind::Accept => {
            let id = required(op.id, "accept requires a request id")?;
            engine.accept_request(id).await
        }
        OperationKind::Reject => {
            let id = required(op.id, "reject requires a request id")?;
            engine.delete_request(id).await
        }
        OperationKind::Spend => {
            let card = required(op.card, "spend requires a card")?;
            let amount = required(op.amount, "spend requires an amount")?;
            let category = required(op.note, "spend requires a category in the note column")?;
            engine
                .spend_money(&CardNumber::new(card), amount, &category)
                .await?;
            Ok(())
        }
        OperationKind::Roundup => {
            let card = required(op.card, "roundup requires a card")?;
            let enabled = match required(op.note, "roundup requires on or off in the note column")?
                .as_str()
            {
                "on" => true,
                "off" => false,
                other => {
                    return Err(LedgerError::InvalidOperation(format!(
                        "roundup expects on or off, got {other}"
                    )));
                }
            };
            let goal = op.amount.unwrap_or(Decimal::ZERO);
            engine
                .set_round_up(&CardNumber::new(card), enabled, goal)
                .await?;
            Ok(())
        }
    }
}
