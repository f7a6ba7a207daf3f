use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::application::{AppError, Session};
use crate::domain::{SavingsChallenge, Transaction};

pub const CSV_HEADER: [&str; 7] = [
    "id",
    "sequence",
    "timestamp",
    "kind",
    "category",
    "amount_cents",
    "note",
];

/// Full copy of a session's ledger and tracker. Used both as an export
/// format and as seed data when a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub challenges: Vec<SavingsChallenge>,
}

impl Snapshot {
    pub fn new(
        transactions: Vec<Transaction>,
        challenges: Vec<SavingsChallenge>,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at,
            transactions,
            challenges,
        }
    }

    /// Copy the signed-in user's data out of a session.
    pub fn capture(session: &Session, now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self::new(
            session.transactions()?,
            session.challenges()?,
            now,
        ))
    }
}

/// Writes session data to CSV or JSON.
pub struct Exporter<'a> {
    session: &'a Session,
}

impl<'a> Exporter<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Export transactions to CSV, most recent first. Returns the number of rows written.
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.session.transactions()?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(CSV_HEADER)?;

        for t in &transactions {
            csv_writer.write_record([
                t.id.to_string(),
                t.sequence.to_string(),
                t.timestamp.to_rfc3339(),
                t.kind.as_str().to_string(),
                t.category.name.clone(),
                t.amount_cents.to_string(),
                t.note.clone().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export the whole session as a pretty-printed JSON snapshot.
    pub fn export_snapshot_json<W: Write>(&self, mut writer: W) -> Result<Snapshot> {
        let snapshot = Snapshot::capture(self.session, Utc::now())?;

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }

    /// Export to a file, picking the format from the extension: `.csv` writes
    /// transactions, anything else writes a JSON snapshot. Returns the number of
    /// records written.
    pub fn export_to_path(&self, path: &Path) -> Result<usize> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let count = if is_csv(path) {
            self.export_transactions_csv(file)?
        } else {
            let snapshot = self.export_snapshot_json(file)?;
            snapshot.transactions.len() + snapshot.challenges.len()
        };

        info!(path = %path.display(), count, "Exported session data");
        Ok(count)
    }
}

pub(crate) fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
