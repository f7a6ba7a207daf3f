use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Transaction, TransactionKind, find_category_by_name, parse_date};
use crate::storage::{Ledger, StoreError, Tracker};

use super::Snapshot;
use super::export::is_csv;

/// Transactions read from a CSV file, plus the rows that could not be read.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub transactions: Vec<Transaction>,
    pub errors: Vec<ImportError>,
}

/// A rejected CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

impl ImportError {
    fn new(line: usize, field: Option<&str>, error: impl Into<String>) -> Self {
        Self {
            line,
            field: field.map(str::to_string),
            error: error.into(),
        }
    }
}

impl Snapshot {
    /// Split the snapshot into stores, checking the same invariants the stores
    /// enforce at runtime.
    pub fn into_stores(self) -> Result<(Ledger, Tracker), StoreError> {
        let ledger = Ledger::from_transactions(self.transactions)?;
        let tracker = Tracker::from_challenges(self.challenges)?;
        Ok((ledger, tracker))
    }
}

pub fn read_snapshot_json<R: Read>(reader: R) -> Result<Snapshot> {
    let snapshot: Snapshot = serde_json::from_reader(reader).context("Invalid snapshot JSON")?;
    Ok(snapshot)
}

/// Load seed data from a file. A `.csv` file yields a snapshot holding only
/// transactions; malformed rows abort the load.
pub fn load_seed_file(path: &Path) -> Result<Snapshot> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let snapshot = if is_csv(path) {
        let result = read_transactions_csv(file)?;
        if let Some(first) = result.errors.first() {
            bail!(
                "{}: {} bad row(s), first at line {}: {}",
                path.display(),
                result.errors.len(),
                first.line,
                first.error
            );
        }
        Snapshot::new(result.transactions, Vec::new(), Utc::now())
    } else {
        read_snapshot_json(file).with_context(|| format!("Failed to read {}", path.display()))?
    };

    info!(
        path = %path.display(),
        transactions = snapshot.transactions.len(),
        challenges = snapshot.challenges.len(),
        "Loaded seed data"
    );
    Ok(snapshot)
}

/// Read transactions in the export CSV layout. Rows that fail to parse are
/// collected in `errors` and skipped; the rest are returned as-is.
pub fn read_transactions_csv<R: Read>(reader: R) -> Result<ImportResult> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut transactions = Vec::new();
    let mut errors = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        let line = index + 2; // header is line 1

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                errors.push(ImportError::new(line, None, format!("CSV parse error: {}", e)));
                continue;
            }
        };

        match parse_row(&record) {
            Ok(t) => transactions.push(t),
            Err((field, error)) => {
                warn!(line, field, %error, "Skipping CSV row");
                errors.push(ImportError::new(line, Some(field), error));
            }
        }
    }

    Ok(ImportResult {
        transactions,
        errors,
    })
}

fn parse_row(record: &csv::StringRecord) -> Result<Transaction, (&'static str, String)> {
    let field = move |i: usize| record.get(i).unwrap_or("").trim();

    let id = Uuid::parse_str(field(0)).map_err(|e| ("id", format!("Invalid id: {}", e)))?;
    let sequence: i64 = field(1)
        .parse()
        .map_err(|_| ("sequence", format!("Invalid sequence: {}", field(1))))?;
    let timestamp = parse_timestamp(field(2))
        .ok_or_else(|| ("timestamp", format!("Invalid timestamp: {}", field(2))))?;
    let kind = TransactionKind::from_str(field(3))
        .ok_or_else(|| ("kind", format!("Unknown kind: {}", field(3))))?;
    let category = find_category_by_name(kind, field(4))
        .ok_or_else(|| ("category", format!("Unknown {} category: {}", kind, field(4))))?;
    let amount_cents: i64 = field(5)
        .parse()
        .map_err(|_| ("amount_cents", format!("Invalid amount: {}", field(5))))?;
    if amount_cents <= 0 {
        return Err(("amount_cents", format!("Amount must be positive: {}", amount_cents)));
    }

    let mut transaction = Transaction::new(amount_cents, kind, category, timestamp);
    transaction.id = id;
    transaction.sequence = sequence;
    let note = record.get(6).unwrap_or("");
    if !note.trim().is_empty() {
        transaction = transaction.with_note(note);
    }
    Ok(transaction)
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_date(s))
}
