mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use common::{create_challenge, days_from, sample_session, signed_in_session};
use pitaka::application::AppError;
use pitaka::domain::{
    ChallengeDraft, DEFAULT_CHALLENGE_ICON, Frequency, SavingsChallenge, estimate_per_period,
    progress_percent,
};
use pitaka::storage::{StoreError, Tracker};
use uuid::Uuid;

#[test]
fn test_weekly_estimate_on_create() -> Result<()> {
    let mut session = signed_in_session()?;
    let now = Utc::now();

    let challenge = create_challenge(&mut session, "Trip", 50000, Frequency::Weekly, 70, now)?;
    assert_eq!(challenge.estimated_cents, 5000);
    assert_eq!(challenge.current_amount_cents, 0);
    assert_eq!(challenge.icon, DEFAULT_CHALLENGE_ICON);
    Ok(())
}

#[test]
fn test_estimate_examples() {
    let now = Utc::now();
    assert_eq!(
        estimate_per_period(90000, Frequency::Monthly, days_from(now, 90), now),
        30000
    );

    for frequency in [Frequency::Daily, Frequency::Weekly, Frequency::Monthly] {
        assert_eq!(estimate_per_period(90000, frequency, days_from(now, -3), now), 0);
        assert_eq!(estimate_per_period(90000, frequency, now, now), 0);
    }
}

#[test]
fn test_progress_is_monotonic_and_capped() {
    let goal = 50000;
    let mut previous = 0.0;
    for current in (0..=120000).step_by(2500) {
        let percent = progress_percent(current, goal);
        assert!(percent >= previous);
        assert!(percent <= 100.0);
        previous = percent;
    }
    assert_eq!(progress_percent(75000, goal), 100.0);
}

#[test]
fn test_saving_entries_keep_current_amount_in_sync() -> Result<()> {
    let mut session = signed_in_session()?;
    let now = Utc::now();
    let challenge = create_challenge(&mut session, "Laptop", 7_500_000, Frequency::Monthly, 60, now)?;

    for (days_ago, amount) in [(10, 150_000), (5, 25_050), (0, 1)] {
        session.add_saving(
            challenge.id,
            amount,
            Some(format!("{} days ago", days_ago)),
            now - Duration::days(days_ago),
            now,
        )?;
        let stored = session.challenge(challenge.id)?;
        assert_eq!(stored.current_amount_cents, stored.entries_total());
    }

    let stored = session.challenge(challenge.id)?;
    assert_eq!(stored.current_amount_cents, 175_051);
    // Most recent entry first
    assert_eq!(stored.saving_entries[0].amount_cents, 1);

    let err = session.add_saving(challenge.id, 0, None, now, now).unwrap_err();
    assert_eq!(err, AppError::Store(StoreError::InvalidAmount(0)));
    assert_eq!(session.challenge(challenge.id)?.saving_entries.len(), 3);
    Ok(())
}

#[test]
fn test_add_challenge_is_idempotent() -> Result<()> {
    let now = Utc::now();
    let draft = ChallengeDraft::new("Fund", 100_000, Frequency::Monthly, days_from(now, 90));
    let challenge = SavingsChallenge::from_draft(draft, now);

    let mut tracker = Tracker::new();
    assert!(tracker.add_challenge(challenge.clone()));

    let mut renamed = challenge.clone();
    renamed.name = "Other".into();
    assert!(!tracker.add_challenge(renamed));

    assert_eq!(tracker.len(), 1);
    assert_eq!(tracker.list_challenges()[0].name, "Fund");
    Ok(())
}

#[test]
fn test_edit_recomputes_estimate_and_keeps_entries() -> Result<()> {
    let mut session = signed_in_session()?;
    let now = Utc::now();
    let challenge = create_challenge(&mut session, "Fund", 90000, Frequency::Monthly, 90, now)?;
    session.add_saving(challenge.id, 10000, None, now, now)?;

    let mut draft = ChallengeDraft::from_challenge(&challenge);
    draft.frequency = Frequency::Weekly;
    draft.finish_date = days_from(now, 70);
    let edited = session.edit_challenge(challenge.id, draft, now)?;

    assert_eq!(edited.estimated_cents, 9000);
    assert_eq!(edited.current_amount_cents, 10000);
    assert_eq!(edited.saving_entries.len(), 1);
    assert_eq!(edited.created_at, challenge.created_at);

    // Position is kept
    create_challenge(&mut session, "Second", 100, Frequency::Daily, 5, now)?;
    let mut draft = ChallengeDraft::from_challenge(&edited);
    draft.name = "Renamed".into();
    session.edit_challenge(challenge.id, draft, now)?;
    assert_eq!(session.challenges()?[0].name, "Renamed");
    Ok(())
}

#[test]
fn test_unknown_challenge_is_reported_and_changes_nothing() -> Result<()> {
    let now = Utc::now();
    let mut session = sample_session(now)?;
    let before = session.challenges()?;
    let missing = Uuid::new_v4();

    let draft = ChallengeDraft::new("Ghost", 100, Frequency::Daily, days_from(now, 10));
    assert_eq!(
        session.edit_challenge(missing, draft, now).unwrap_err(),
        AppError::Store(StoreError::ChallengeNotFound(missing))
    );
    assert_eq!(
        session.delete_challenge(missing).unwrap_err(),
        AppError::Store(StoreError::ChallengeNotFound(missing))
    );
    assert!(session.add_saving(missing, 100, None, now, now).is_err());

    assert_eq!(session.challenges()?, before);
    Ok(())
}

#[test]
fn test_delete_challenge() -> Result<()> {
    let now = Utc::now();
    let mut session = sample_session(now)?;
    let first = session.challenges()?[0].clone();

    let removed = session.delete_challenge(first.id)?;
    assert_eq!(removed.name, "Emergency Fund");
    assert_eq!(session.challenges()?.len(), 2);
    assert_eq!(session.total_saved()?, 3_800_000);
    Ok(())
}

#[test]
fn test_challenge_progress() -> Result<()> {
    let now = Utc::now();
    let session = sample_session(now)?;
    let laptop = session.challenges()?[2].clone();

    let progress = session.challenge_progress(laptop.id)?;
    assert_eq!(progress.percent, 40.0);
    assert_eq!(progress.remaining, 4_500_000);
    Ok(())
}
