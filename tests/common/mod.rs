// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use pitaka::application::{LocalIdentityProvider, Session};
use pitaka::domain::{ChallengeDraft, Frequency, SavingsChallenge};
use pitaka::io::Snapshot;

pub const EMAIL: &str = "ana@example.com";
pub const PASSWORD: &str = "secret1";

/// Fresh session with empty stores and a signed-in user.
pub fn signed_in_session() -> Result<Session> {
    let mut session = Session::new(Box::new(LocalIdentityProvider::new()));
    session.sign_up(EMAIL, PASSWORD)?;
    Ok(session)
}

/// Signed-in session seeded with the demo data.
pub fn sample_session(now: DateTime<Utc>) -> Result<Session> {
    let (ledger, tracker) = Snapshot::sample(now).into_stores()?;
    let mut session = Session::with_stores(Box::new(LocalIdentityProvider::new()), ledger, tracker);
    session.sign_up(EMAIL, PASSWORD)?;
    Ok(session)
}

pub fn days_from(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days)
}

/// Create a challenge finishing `days` after `now`.
pub fn create_challenge(
    session: &mut Session,
    name: &str,
    goal_cents: i64,
    frequency: Frequency,
    days: i64,
    now: DateTime<Utc>,
) -> Result<SavingsChallenge> {
    let draft = ChallengeDraft::new(name, goal_cents, frequency, days_from(now, days));
    Ok(session.create_challenge(draft, now)?)
}
