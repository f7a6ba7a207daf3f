use super::{Cents, Transaction, TransactionKind};

/// Sum of amounts for all transactions of the given kind.
pub fn total_for_kind<'a, I>(transactions: I, kind: TransactionKind) -> Cents
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount_cents)
        .sum()
}

/// Like [`total_for_kind`], but `None` when the sum does not fit in [`Cents`].
pub fn checked_total_for_kind<'a, I>(transactions: I, kind: TransactionKind) -> Option<Cents>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| t.kind == kind)
        .try_fold(0 as Cents, |total, t| total.checked_add(t.amount_cents))
}

/// Balance = total income - total expenses.
pub fn compute_balance<'a, I>(transactions: I) -> Cents
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(0, |balance, t| balance + t.signed_amount())
}

/// Totals per category name for one kind, in order of first appearance.
/// Each entry is (category name, total, number of transactions).
pub fn totals_by_category<'a, I>(transactions: I, kind: TransactionKind) -> Vec<(String, Cents, usize)>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: Vec<(String, Cents, usize)> = Vec::new();

    for t in transactions.into_iter().filter(|t| t.kind == kind) {
        match totals.iter_mut().find(|(name, ..)| *name == t.category.name) {
            Some((_, total, count)) => {
                *total += t.amount_cents;
                *count += 1;
            }
            None => totals.push((t.category.name.clone(), t.amount_cents, 1)),
        }
    }

    totals
}

/// Filter transactions by a search query, preserving order.
/// A blank or whitespace-only query matches everything; any other query is
/// matched as typed, surrounding spaces included.
pub fn filter_by_query<'a, I>(transactions: I, query: &str) -> Vec<Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let match_all = query.trim().is_empty();
    let needle = query.to_lowercase();
    transactions
        .into_iter()
        .filter(|t| match_all || t.matches(&needle))
        .cloned()
        .collect()
}
