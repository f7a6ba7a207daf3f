use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type ChallengeId = Uuid;
pub type SavingEntryId = Uuid;

pub const DEFAULT_CHALLENGE_ICON: &str = "wallet";
pub const DEFAULT_CHALLENGE_COLOR: &str = "#4CAF50";

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// How often the user plans to put money aside for a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            _ => None,
        }
    }

    /// Unit label for "per period" displays, e.g. "₱500.00/week".
    pub fn unit(&self) -> &'static str {
        match self {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
        }
    }

    /// Number of contribution periods covering `days` days. A partial period counts as one.
    /// Months are treated as 30 days.
    pub fn periods_in(&self, days: u64) -> u64 {
        match self {
            Frequency::Daily => days,
            Frequency::Weekly => days.div_ceil(7),
            Frequency::Monthly => days.div_ceil(30),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whole days from `as_of` until `finish_date`, rounding any partial day up.
/// Zero when the finish date is not in the future.
pub fn days_until(finish_date: DateTime<Utc>, as_of: DateTime<Utc>) -> u64 {
    let millis = (finish_date - as_of).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    // millis > 0 so the cast is lossless
    (millis as u64).div_ceil(MILLIS_PER_DAY as u64)
}

/// Amount to put aside each period to reach `goal_cents` by `finish_date`,
/// rounded to the nearest cent.
///
/// Returns 0 when the goal is not positive or the finish date has already passed,
/// so a stale or invalid challenge never yields a negative or unbounded estimate.
pub fn estimate_per_period(
    goal_cents: Cents,
    frequency: Frequency,
    finish_date: DateTime<Utc>,
    as_of: DateTime<Utc>,
) -> Cents {
    let diff_days = days_until(finish_date, as_of);
    if diff_days == 0 || goal_cents <= 0 {
        return 0;
    }

    let periods = frequency.periods_in(diff_days);
    if periods == 0 {
        return 0;
    }

    let periods = periods as i64;
    (goal_cents + periods / 2) / periods
}

/// Saved amount as a percentage of the goal, capped at 100.
/// A non-positive goal reports 0 rather than a non-finite value.
pub fn progress_percent(current_cents: Cents, goal_cents: Cents) -> f64 {
    if goal_cents <= 0 {
        return 0.0;
    }
    (current_cents as f64 / goal_cents as f64 * 100.0).min(100.0)
}

/// One contribution towards a challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingEntry {
    pub id: SavingEntryId,
    pub amount_cents: Cents,
    pub note: Option<String>,
    /// When the money was saved. May be backdated, never in the future.
    pub date: DateTime<Utc>,
}

impl SavingEntry {
    pub fn new(amount_cents: Cents, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount_cents,
            note: None,
            date,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// User-supplied fields of a challenge, used both to create and to edit one.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeDraft {
    pub name: String,
    pub goal_amount_cents: Cents,
    pub frequency: Frequency,
    pub finish_date: DateTime<Utc>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

impl ChallengeDraft {
    pub fn new(
        name: impl Into<String>,
        goal_amount_cents: Cents,
        frequency: Frequency,
        finish_date: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            goal_amount_cents,
            frequency,
            finish_date,
            icon: None,
            color: None,
            description: None,
        }
    }

    /// Start an edit from the challenge's current values.
    pub fn from_challenge(challenge: &SavingsChallenge) -> Self {
        Self {
            name: challenge.name.clone(),
            goal_amount_cents: challenge.goal_amount_cents,
            frequency: challenge.frequency,
            finish_date: challenge.finish_date,
            icon: Some(challenge.icon.clone()),
            color: Some(challenge.color.clone()),
            description: challenge.description.clone(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A goal-oriented savings plan.
///
/// `estimated_cents` is stored rather than computed on read: it reflects the
/// plan as of the last create or edit, not the current date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsChallenge {
    pub id: ChallengeId,
    pub name: String,
    pub goal_amount_cents: Cents,
    pub frequency: Frequency,
    pub finish_date: DateTime<Utc>,
    pub estimated_cents: Cents,
    /// Always equal to the sum of `saving_entries` amounts
    pub current_amount_cents: Cents,
    pub icon: String,
    pub color: String,
    pub description: Option<String>,
    /// Most recent first
    pub saving_entries: Vec<SavingEntry>,
    pub created_at: DateTime<Utc>,
}

impl SavingsChallenge {
    /// Create a challenge from a draft, computing the estimate as of `as_of`.
    pub fn from_draft(draft: ChallengeDraft, as_of: DateTime<Utc>) -> Self {
        let mut challenge = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            goal_amount_cents: 0,
            frequency: draft.frequency,
            finish_date: draft.finish_date,
            estimated_cents: 0,
            current_amount_cents: 0,
            icon: DEFAULT_CHALLENGE_ICON.to_string(),
            color: DEFAULT_CHALLENGE_COLOR.to_string(),
            description: None,
            saving_entries: Vec::new(),
            created_at: as_of,
        };
        challenge.apply_draft(draft, as_of);
        challenge
    }

    /// Replace the user-editable fields and recompute the estimate.
    /// Entries and the current amount are left untouched.
    pub fn apply_draft(&mut self, draft: ChallengeDraft, as_of: DateTime<Utc>) {
        self.name = draft.name.trim().to_string();
        self.goal_amount_cents = draft.goal_amount_cents;
        self.frequency = draft.frequency;
        self.finish_date = draft.finish_date;
        self.icon = draft
            .icon
            .unwrap_or_else(|| DEFAULT_CHALLENGE_ICON.to_string());
        self.color = draft
            .color
            .unwrap_or_else(|| DEFAULT_CHALLENGE_COLOR.to_string());
        self.description = draft.description;
        self.recompute_estimate(as_of);
    }

    pub fn recompute_estimate(&mut self, as_of: DateTime<Utc>) {
        self.estimated_cents = estimate_per_period(
            self.goal_amount_cents,
            self.frequency,
            self.finish_date,
            as_of,
        );
    }

    /// Record a contribution: the entry goes to the head of the history and the
    /// current amount grows by the same amount. The amount is validated by the tracker.
    pub(crate) fn push_entry(&mut self, entry: SavingEntry) {
        self.current_amount_cents += entry.amount_cents;
        self.saving_entries.insert(0, entry);
    }

    /// Sum of all entry amounts. Always fits for a challenge held by a tracker.
    pub fn entries_total(&self) -> Cents {
        self.saving_entries.iter().map(|e| e.amount_cents).sum()
    }

    /// Like [`Self::entries_total`], but `None` when the sum does not fit in [`Cents`].
    pub fn checked_entries_total(&self) -> Option<Cents> {
        self.saving_entries
            .iter()
            .try_fold(0 as Cents, |total, e| total.checked_add(e.amount_cents))
    }

    pub fn is_consistent(&self) -> bool {
        self.checked_entries_total() == Some(self.current_amount_cents)
    }

    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.current_amount_cents, self.goal_amount_cents)
    }

    pub fn remaining_cents(&self) -> Cents {
        (self.goal_amount_cents - self.current_amount_cents).max(0)
    }

    pub fn is_complete(&self) -> bool {
        self.current_amount_cents >= self.goal_amount_cents
    }
}
