use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Cents};

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (salary, freelance work, refunds...)
    Income,
    /// Money going out
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }

    /// Sign used when displaying an amount of this kind.
    pub fn sign(&self) -> char {
        match self {
            TransactionKind::Income => '+',
            TransactionKind::Expense => '-',
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single income or expense record.
/// Transactions are immutable once recorded; the ledger never edits or removes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Monotonically increasing insertion counter, assigned by the ledger
    pub sequence: i64,
    /// Always positive; the kind carries the direction
    pub amount_cents: Cents,
    pub note: Option<String>,
    pub kind: TransactionKind,
    pub category: Category,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction. The sequence number is assigned by the ledger.
    pub fn new(
        amount_cents: Cents,
        kind: TransactionKind,
        category: Category,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence: 0,
            amount_cents,
            note: None,
            kind,
            category,
            timestamp,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Amount with its direction applied: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> Cents {
        match self.kind {
            TransactionKind::Income => self.amount_cents,
            TransactionKind::Expense => -self.amount_cents,
        }
    }

    /// Case-insensitive substring match against the category name or the note.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.category.name.to_lowercase().contains(needle)
            || self
                .note
                .as_deref()
                .is_some_and(|note| note.to_lowercase().contains(needle))
    }
}

/// Shorten a note for list views: at most `max_chars` characters followed by "...".
pub fn truncate_note(note: &str, max_chars: usize) -> String {
    if note.chars().count() <= max_chars {
        return note.to_string();
    }
    let mut truncated: String = note.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::find_category;

    fn food() -> Category {
        find_category(TransactionKind::Expense, "1").unwrap()
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            assert_eq!(TransactionKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(TransactionKind::from_str(" Expense "), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::from_str("transfer"), None);
    }

    #[test]
    fn test_signed_amount() {
        let expense = Transaction::new(4550, TransactionKind::Expense, food(), Utc::now());
        assert_eq!(expense.signed_amount(), -4550);
        assert!(!expense.is_income());
    }

    #[test]
    fn test_matches_category_or_note() {
        let t = Transaction::new(12000, TransactionKind::Expense, food(), Utc::now())
            .with_note("Groceries shopping");

        assert!(t.matches("grocer"));
        assert!(t.matches("dining"));
        assert!(!t.matches("salary"));
    }

    #[test]
    fn test_matches_without_note() {
        let t = Transaction::new(12000, TransactionKind::Expense, food(), Utc::now());
        assert!(t.matches("food"));
        assert!(!t.matches("lunch"));
    }

    #[test]
    fn test_truncate_note() {
        assert_eq!(truncate_note("short", 50), "short");
        assert_eq!(truncate_note("abcdef", 3), "abc...");
        assert_eq!(truncate_note("ñandú ñandú", 5), "ñandú...");
    }
}
