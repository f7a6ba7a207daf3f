use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::domain::{
    Cents, ChallengeDraft, ChallengeId, SavingEntry, SavingsChallenge, Transaction,
    TransactionKind, find_category,
};
use crate::storage::{Ledger, StoreError, Tracker};

use super::{
    AppError, CategoryReport, IdentityProvider, LedgerSummary, SavingsOverview, User,
    build_category_report,
};

/// A challenge together with its derived progress figures.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeProgress {
    pub challenge: SavingsChallenge,
    pub percent: f64,
    pub remaining: Cents,
}

/// One user session: the signed-in user plus the ledger and tracker they work with.
///
/// This is the interface for any front end. Every ledger and tracker operation
/// requires a signed-in user and fails with [`AppError::NotAuthenticated`] otherwise.
pub struct Session {
    identity: Box<dyn IdentityProvider>,
    user: Option<User>,
    ledger: Ledger,
    tracker: Tracker,
}

impl Session {
    /// Start a session with empty stores.
    pub fn new(identity: Box<dyn IdentityProvider>) -> Self {
        Self::with_stores(identity, Ledger::new(), Tracker::new())
    }

    /// Start a session over pre-populated stores (seed data or a restored snapshot).
    pub fn with_stores(identity: Box<dyn IdentityProvider>, ledger: Ledger, tracker: Tracker) -> Self {
        Self {
            identity,
            user: None,
            ledger,
            tracker,
        }
    }

    // ========================
    // Authentication
    // ========================

    /// Create an account and sign it in.
    pub fn sign_up(&mut self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self.identity.sign_up(email, password)?;
        info!(user_id = %user.id, "Signed up");
        self.user = Some(user.clone());
        Ok(user)
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self.identity.sign_in(email, password)?;
        info!(user_id = %user.id, "Signed in");
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Sign out, returning the user that was signed in (if any).
    pub fn sign_out(&mut self) -> Option<User> {
        let user = self.user.take();
        if let Some(user) = &user {
            info!(user_id = %user.id, "Signed out");
        }
        user
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    fn require_user(&self) -> Result<&User, AppError> {
        self.user.as_ref().ok_or(AppError::NotAuthenticated)
    }

    /// Read access to the ledger, e.g. for exporting.
    pub fn ledger(&self) -> Result<&Ledger, AppError> {
        self.require_user()?;
        Ok(&self.ledger)
    }

    /// Read access to the tracker, e.g. for exporting.
    pub fn tracker(&self) -> Result<&Tracker, AppError> {
        self.require_user()?;
        Ok(&self.tracker)
    }

    // ========================
    // Transactions
    // ========================

    /// Record an income or expense. The category id is resolved in the catalog
    /// for `kind`; a blank note is stored as no note.
    pub fn record_transaction(
        &mut self,
        amount_cents: Cents,
        note: Option<String>,
        kind: TransactionKind,
        category_id: &str,
    ) -> Result<Transaction, AppError> {
        self.require_user()?;

        let category = find_category(kind, category_id).ok_or_else(|| AppError::CategoryNotFound {
            kind,
            id: category_id.to_string(),
        })?;

        Ok(self
            .ledger
            .add_transaction(amount_cents, clean_note(note), kind, category)?)
    }

    /// Full history, most recent first.
    pub fn transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.ledger()?.list_transactions())
    }

    pub fn recent_transactions(&self, limit: usize) -> Result<Vec<Transaction>, AppError> {
        Ok(self.ledger()?.list_recent(limit))
    }

    pub fn search_transactions(&self, query: &str) -> Result<Vec<Transaction>, AppError> {
        Ok(self.ledger()?.search(query))
    }

    pub fn summary(&self) -> Result<LedgerSummary, AppError> {
        let ledger = self.ledger()?;
        Ok(LedgerSummary {
            total_income: ledger.total_income(),
            total_expenses: ledger.total_expenses(),
            balance: ledger.balance(),
            transaction_count: ledger.len(),
        })
    }

    /// Per-category breakdown of income or expenses, largest first.
    pub fn category_report(&self, kind: TransactionKind) -> Result<CategoryReport, AppError> {
        let rows = self.ledger()?.category_totals(kind);
        Ok(build_category_report(kind, rows))
    }

    // ========================
    // Savings challenges
    // ========================

    /// Create a savings challenge and add it to the tracker.
    ///
    /// The finish date must be at least one day after `now`. The estimated
    /// per-period contribution is computed here, once.
    pub fn create_challenge(
        &mut self,
        draft: ChallengeDraft,
        now: DateTime<Utc>,
    ) -> Result<SavingsChallenge, AppError> {
        self.require_user()?;
        validate_draft(&draft, now)?;

        let challenge = SavingsChallenge::from_draft(draft, now);
        self.insert_challenge(challenge.clone())?;
        Ok(challenge)
    }

    /// A freshly created challenge must land in the tracker; an id clash is an error.
    fn insert_challenge(&mut self, challenge: SavingsChallenge) -> Result<(), AppError> {
        let id = challenge.id;
        if !self.tracker.add_challenge(challenge) {
            warn!(%id, "New challenge id already taken");
            return Err(StoreError::DuplicateChallenge(id).into());
        }
        Ok(())
    }

    /// Replace a challenge's name, goal, frequency, finish date and look, and
    /// recompute its estimate. Saved entries and the current amount are kept.
    pub fn edit_challenge(
        &mut self,
        id: ChallengeId,
        draft: ChallengeDraft,
        now: DateTime<Utc>,
    ) -> Result<SavingsChallenge, AppError> {
        self.require_user()?;
        validate_draft(&draft, now)?;

        let mut challenge = self
            .tracker
            .get(id)
            .cloned()
            .ok_or(StoreError::ChallengeNotFound(id))?;
        challenge.apply_draft(draft, now);

        self.tracker.update_challenge(challenge.clone())?;
        Ok(challenge)
    }

    pub fn delete_challenge(&mut self, id: ChallengeId) -> Result<SavingsChallenge, AppError> {
        self.require_user()?;
        Ok(self.tracker.delete_challenge(id)?)
    }

    /// Record money put aside for a challenge. `date` may be backdated but not
    /// later than `now`.
    pub fn add_saving(
        &mut self,
        id: ChallengeId,
        amount_cents: Cents,
        note: Option<String>,
        date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<SavingEntry, AppError> {
        self.require_user()?;

        if date > now {
            return Err(AppError::FutureEntryDate(date));
        }

        Ok(self
            .tracker
            .add_saving_entry(id, amount_cents, clean_note(note), date)?)
    }

    /// All challenges in creation order.
    pub fn challenges(&self) -> Result<Vec<SavingsChallenge>, AppError> {
        Ok(self.tracker()?.list_challenges())
    }

    pub fn challenge(&self, id: ChallengeId) -> Result<SavingsChallenge, AppError> {
        self.tracker()?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::ChallengeNotFound(id).into())
    }

    pub fn challenge_progress(&self, id: ChallengeId) -> Result<ChallengeProgress, AppError> {
        let challenge = self.challenge(id)?;
        debug!(%id, "Computed challenge progress");
        Ok(ChallengeProgress {
            percent: challenge.progress_percent(),
            remaining: challenge.remaining_cents(),
            challenge,
        })
    }

    /// Sum saved across every challenge.
    pub fn total_saved(&self) -> Result<Cents, AppError> {
        Ok(self.tracker()?.total_saved())
    }

    pub fn savings_overview(&self) -> Result<SavingsOverview, AppError> {
        let tracker = self.tracker()?;
        Ok(SavingsOverview {
            active_challenges: tracker.len(),
            total_saved: tracker.total_saved(),
        })
    }
}

fn validate_draft(draft: &ChallengeDraft, now: DateTime<Utc>) -> Result<(), AppError> {
    if draft.name.trim().is_empty() {
        return Err(AppError::EmptyName);
    }
    if draft.goal_amount_cents <= 0 {
        return Err(AppError::InvalidGoal);
    }

    let earliest = now + Duration::days(1);
    if draft.finish_date < earliest {
        return Err(AppError::FinishDateTooSoon {
            finish_date: draft.finish_date,
            earliest,
        });
    }
    Ok(())
}

fn clean_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
