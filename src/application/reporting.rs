use serde::{Deserialize, Serialize};

use crate::domain::{Cents, TransactionKind};

/// Dashboard totals for the whole ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_income: Cents,
    pub total_expenses: Cents,
    pub balance: Cents,
    pub transaction_count: usize,
}

/// Headline numbers for the savings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsOverview {
    pub active_challenges: usize,
    pub total_saved: Cents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub kind: TransactionKind,
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    /// Share of the report total, 0-100
    pub percentage: f64,
}

/// Build a category breakdown from per-category (name, total, count) rows.
/// Categories are ordered by total, largest first; ties keep their input order.
pub fn build_category_report(
    kind: TransactionKind,
    rows: Vec<(String, Cents, usize)>,
) -> CategoryReport {
    let total: Cents = rows.iter().map(|(_, amount, _)| amount).sum();

    let mut categories: Vec<CategorySummary> = rows
        .into_iter()
        .map(|(category, amount, count)| CategorySummary {
            category,
            total: amount,
            count,
            percentage: if total > 0 {
                amount as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();
    categories.sort_by(|a, b| b.total.cmp(&a.total));

    CategoryReport {
        kind,
        categories,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_category_report() {
        let report = build_category_report(
            TransactionKind::Expense,
            vec![
                ("Food & Dining".into(), 2500, 2),
                ("Shopping".into(), 5000, 1),
                ("Transportation".into(), 2500, 3),
            ],
        );

        assert_eq!(report.total, 10000);
        let names: Vec<&str> = report.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Shopping", "Food & Dining", "Transportation"]);
        assert_eq!(report.categories[0].percentage, 50.0);
        assert_eq!(report.categories[2].count, 3);
    }

    #[test]
    fn test_empty_report() {
        let report = build_category_report(TransactionKind::Income, Vec::new());
        assert_eq!(report.total, 0);
        assert!(report.categories.is_empty());
    }
}
