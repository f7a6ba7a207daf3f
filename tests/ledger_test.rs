mod common;

use anyhow::Result;
use chrono::Utc;
use common::{sample_session, signed_in_session};
use pitaka::application::AppError;
use pitaka::domain::TransactionKind;
use pitaka::storage::StoreError;

#[test]
fn test_income_then_expense_scenario() -> Result<()> {
    let mut session = signed_in_session()?;

    // Income category 1 is Salary, expense category 1 is Food & Dining
    session.record_transaction(10000, None, TransactionKind::Income, "1")?;
    session.record_transaction(4000, None, TransactionKind::Expense, "1")?;

    let summary = session.summary()?;
    assert_eq!(summary.total_income, 10000);
    assert_eq!(summary.total_expenses, 4000);
    assert_eq!(summary.balance, 6000);

    let recent = session.recent_transactions(1)?;
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].category.name, "Food & Dining");

    Ok(())
}

#[test]
fn test_balance_invariant_holds_after_every_add() -> Result<()> {
    let mut session = signed_in_session()?;
    let entries = [
        (120000, TransactionKind::Income, "1"),
        (4550, TransactionKind::Expense, "1"),
        (890, TransactionKind::Expense, "29"),
        (30000, TransactionKind::Income, "2"),
        (200000, TransactionKind::Expense, "24"),
    ];

    for (amount, kind, category) in entries {
        session.record_transaction(amount, None, kind, category)?;
        let summary = session.summary()?;
        assert_eq!(summary.balance, summary.total_income - summary.total_expenses);
    }
    assert_eq!(session.summary()?.balance, -55440);

    Ok(())
}

#[test]
fn test_invalid_amount_has_no_side_effect() -> Result<()> {
    let mut session = signed_in_session()?;
    session.record_transaction(500, None, TransactionKind::Income, "1")?;

    for amount in [0, -100] {
        let err = session
            .record_transaction(amount, None, TransactionKind::Expense, "1")
            .unwrap_err();
        assert_eq!(err, AppError::Store(StoreError::InvalidAmount(amount)));
    }

    assert_eq!(session.transactions()?.len(), 1);
    assert_eq!(session.summary()?.balance, 500);
    Ok(())
}

#[test]
fn test_listing_is_a_snapshot() -> Result<()> {
    let mut session = signed_in_session()?;
    session.record_transaction(500, Some("first".into()), TransactionKind::Income, "1")?;

    let mut listed = session.transactions()?;
    listed.clear();

    assert_eq!(session.transactions()?.len(), 1);
    assert_eq!(session.recent_transactions(10)?.len(), 1);
    Ok(())
}

#[test]
fn test_search_on_sample_data() -> Result<()> {
    let session = sample_session(Utc::now())?;

    let found = session.search_transactions("grocer")?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].note.as_deref(), Some("Groceries shopping"));

    // Category names match too
    let bills = session.search_transactions("BILLS")?;
    assert_eq!(bills.len(), 1);

    let all = session.search_transactions("")?;
    assert_eq!(all, session.transactions()?);
    Ok(())
}

#[test]
fn test_category_report() -> Result<()> {
    let mut session = signed_in_session()?;
    session.record_transaction(3000, None, TransactionKind::Expense, "1")?;
    session.record_transaction(1000, None, TransactionKind::Expense, "2")?;
    session.record_transaction(1000, None, TransactionKind::Expense, "1")?;
    session.record_transaction(9999, None, TransactionKind::Income, "1")?;

    let report = session.category_report(TransactionKind::Expense)?;
    assert_eq!(report.total, 5000);
    assert_eq!(report.categories.len(), 2);
    assert_eq!(report.categories[0].category, "Food & Dining");
    assert_eq!(report.categories[0].count, 2);
    assert_eq!(report.categories[0].percentage, 80.0);
    Ok(())
}
