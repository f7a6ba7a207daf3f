use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::{
    Category, Cents, Transaction, TransactionId, TransactionKind, checked_total_for_kind,
    compute_balance, filter_by_query, total_for_kind, totals_by_category,
};

use super::StoreError;

/// In-memory transaction ledger.
///
/// Records are kept in insertion order internally and always handed out
/// most-recent-first. Every stored transaction has a positive amount, a unique
/// id and a unique, increasing sequence number, and each kind's total fits in
/// [`Cents`].
#[derive(Debug)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    next_sequence: i64,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Restore a ledger from previously recorded transactions (seed data or a snapshot).
    /// Order of the input does not matter; sequence numbers decide recency.
    /// Repeated ids or sequence numbers are rejected.
    pub fn from_transactions(mut transactions: Vec<Transaction>) -> Result<Self, StoreError> {
        if let Some(bad) = transactions.iter().find(|t| t.amount_cents <= 0) {
            return Err(StoreError::InvalidAmount(bad.amount_cents));
        }

        let mut ids = HashSet::with_capacity(transactions.len());
        if let Some(dup) = transactions.iter().find(|t| !ids.insert(t.id)) {
            return Err(StoreError::DuplicateTransaction(dup.id));
        }

        transactions.sort_by_key(|t| t.sequence);
        if let Some(pair) = transactions.windows(2).find(|w| w[0].sequence == w[1].sequence) {
            return Err(StoreError::DuplicateSequence(pair[1].sequence));
        }

        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            if checked_total_for_kind(&transactions, kind).is_none() {
                let largest = transactions
                    .iter()
                    .filter(|t| t.kind == kind)
                    .map(|t| t.amount_cents)
                    .max()
                    .unwrap_or_default();
                return Err(StoreError::AmountOverflow(largest));
            }
        }
        let next_sequence = transactions.last().map_or(1, |t| t.sequence + 1);

        debug!(count = transactions.len(), "Restored ledger");
        Ok(Self {
            transactions,
            next_sequence,
        })
    }

    /// Record a new transaction stamped with the current time.
    /// It becomes the most recent entry in the ledger.
    pub fn add_transaction(
        &mut self,
        amount_cents: Cents,
        note: Option<String>,
        kind: TransactionKind,
        category: Category,
    ) -> Result<Transaction, StoreError> {
        if amount_cents <= 0 {
            warn!(amount_cents, "Rejected transaction with non-positive amount");
            return Err(StoreError::InvalidAmount(amount_cents));
        }
        if checked_total_for_kind(&self.transactions, kind)
            .and_then(|total| total.checked_add(amount_cents))
            .is_none()
        {
            warn!(amount_cents, kind = %kind, "Rejected transaction that would overflow the total");
            return Err(StoreError::AmountOverflow(amount_cents));
        }

        let mut transaction = Transaction::new(amount_cents, kind, category, Utc::now());
        transaction.note = note;
        transaction.sequence = self.next_sequence;
        self.next_sequence += 1;

        info!(
            id = %transaction.id,
            sequence = transaction.sequence,
            kind = %kind,
            amount_cents,
            category = %transaction.category.name,
            "Recorded transaction"
        );

        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    /// All transactions, most recent first. The result is a copy.
    pub fn list_transactions(&self) -> Vec<Transaction> {
        self.iter_recent().cloned().collect()
    }

    /// The `limit` most recent transactions (all of them if there are fewer).
    pub fn list_recent(&self, limit: usize) -> Vec<Transaction> {
        self.iter_recent().take(limit).cloned().collect()
    }

    pub fn total_income(&self) -> Cents {
        total_for_kind(&self.transactions, TransactionKind::Income)
    }

    pub fn total_expenses(&self) -> Cents {
        total_for_kind(&self.transactions, TransactionKind::Expense)
    }

    pub fn balance(&self) -> Cents {
        compute_balance(&self.transactions)
    }

    /// Case-insensitive search over category names and notes, most recent first.
    /// A blank query returns every transaction.
    pub fn search(&self, query: &str) -> Vec<Transaction> {
        let results = filter_by_query(self.iter_recent(), query);
        debug!(query, matches = results.len(), "Searched ledger");
        results
    }

    /// Totals per category for one kind, most recent category first.
    pub fn category_totals(&self, kind: TransactionKind) -> Vec<(String, Cents, usize)> {
        totals_by_category(self.iter_recent(), kind)
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    fn iter_recent(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().rev()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
