use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    Cents, ChallengeDraft, Frequency, SavingEntry, SavingsChallenge, Transaction,
    TransactionKind, find_category,
};

use super::Snapshot;

// (category id, kind, amount in cents, note, hours ago)
const SAMPLE_TRANSACTIONS: &[(&str, TransactionKind, Cents, &str, i64)] = &[
    ("2", TransactionKind::Expense, 6500, "Gas station", 240),
    ("2", TransactionKind::Income, 30000, "Freelance project payment", 168),
    ("5", TransactionKind::Expense, 8500, "Electric bill payment", 120),
    ("3", TransactionKind::Expense, 12000, "Groceries shopping", 72),
    ("1", TransactionKind::Income, 250000, "Monthly salary", 24),
    ("1", TransactionKind::Expense, 4550, "Lunch at restaurant", 2),
];

struct SampleChallenge {
    name: &'static str,
    goal: Cents,
    frequency: Frequency,
    finish_in_days: i64,
    icon: &'static str,
    color: &'static str,
    // (amount, note, days ago), oldest first
    entries: &'static [(Cents, &'static str, i64)],
}

const SAMPLE_CHALLENGES: &[SampleChallenge] = &[
    SampleChallenge {
        name: "Emergency Fund",
        goal: 5_000_000,
        frequency: Frequency::Monthly,
        finish_in_days: 150,
        icon: "wallet",
        color: "#4CAF50",
        entries: &[(500_000, "Salary bonus", 30), (1_000_000, "Monthly savings", 15)],
    },
    SampleChallenge {
        name: "Dream Vacation",
        goal: 8_000_000,
        frequency: Frequency::Weekly,
        finish_in_days: 120,
        icon: "airplane",
        color: "#2196F3",
        entries: &[(300_000, "Side gig earnings", 20), (500_000, "Tax refund", 10)],
    },
    SampleChallenge {
        name: "New Laptop",
        goal: 7_500_000,
        frequency: Frequency::Monthly,
        finish_in_days: 60,
        icon: "phone-portrait",
        color: "#FF9800",
        entries: &[(1_500_000, "Freelance project", 25), (1_500_000, "Monthly allocation", 5)],
    },
];

impl Snapshot {
    /// Demo data placed relative to `now`: six recent transactions and three
    /// challenges with a couple of contributions each.
    pub fn sample(now: DateTime<Utc>) -> Self {
        let transactions = SAMPLE_TRANSACTIONS
            .iter()
            .enumerate()
            .filter_map(|(i, &(category_id, kind, amount, note, hours_ago))| {
                let category = find_category(kind, category_id)?;
                let mut t = Transaction::new(amount, kind, category, now - Duration::hours(hours_ago))
                    .with_note(note);
                t.sequence = i as i64 + 1;
                Some(t)
            })
            .collect();

        let challenges = SAMPLE_CHALLENGES
            .iter()
            .map(|sample| {
                let draft = ChallengeDraft::new(
                    sample.name,
                    sample.goal,
                    sample.frequency,
                    now + Duration::days(sample.finish_in_days),
                )
                .with_icon(sample.icon)
                .with_color(sample.color);

                let created_at = now - Duration::days(60);
                let mut challenge = SavingsChallenge::from_draft(draft, created_at);
                for &(amount, note, days_ago) in sample.entries {
                    challenge.push_entry(
                        SavingEntry::new(amount, now - Duration::days(days_ago)).with_note(note),
                    );
                }
                challenge.recompute_estimate(now);
                challenge
            })
            .collect();

        Self::new(transactions, challenges, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_valid_seed() {
        let now = Utc::now();
        let snapshot = Snapshot::sample(now);
        assert_eq!(snapshot.transactions.len(), 6);
        assert_eq!(snapshot.challenges.len(), 3);

        let (ledger, tracker) = snapshot.into_stores().unwrap();
        assert_eq!(ledger.balance(), 280000 - 31550);
        assert_eq!(tracker.total_saved(), 5_300_000);

        let recent = ledger.list_recent(1);
        assert_eq!(recent[0].note.as_deref(), Some("Lunch at restaurant"));

        let fund = &tracker.list_challenges()[0];
        assert_eq!(fund.current_amount_cents, 1_500_000);
        assert_eq!(fund.saving_entries[0].note.as_deref(), Some("Monthly savings"));
    }
}
