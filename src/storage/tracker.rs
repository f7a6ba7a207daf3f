use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::{Cents, ChallengeId, SavingEntry, SavingsChallenge};

use super::StoreError;

/// In-memory collection of savings challenges, in creation order.
///
/// The tracker stores challenges as given: finish-date and goal checks belong
/// to the caller. It does own the "current amount equals the sum of entries"
/// invariant, which is why entries can only be added through [`Tracker::add_saving_entry`].
#[derive(Debug, Default)]
pub struct Tracker {
    challenges: Vec<SavingsChallenge>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a tracker from seed data or a snapshot.
    /// Rejects duplicated ids, challenges whose current amount disagrees with
    /// their entries, and saved amounts too large to total.
    pub fn from_challenges(challenges: Vec<SavingsChallenge>) -> Result<Self, StoreError> {
        let mut total_saved: Cents = 0;
        for (i, challenge) in challenges.iter().enumerate() {
            if challenges[..i].iter().any(|c| c.id == challenge.id) {
                return Err(StoreError::DuplicateChallenge(challenge.id));
            }
            if let Some(entry) = challenge.saving_entries.iter().find(|e| e.amount_cents <= 0) {
                return Err(StoreError::InvalidAmount(entry.amount_cents));
            }
            let entries_total = challenge
                .checked_entries_total()
                .ok_or(StoreError::AmountOverflow(challenge.current_amount_cents))?;
            if entries_total != challenge.current_amount_cents {
                return Err(StoreError::InconsistentChallenge {
                    id: challenge.id,
                    current_amount: challenge.current_amount_cents,
                    entries_total,
                });
            }
            total_saved = total_saved
                .checked_add(entries_total)
                .ok_or(StoreError::AmountOverflow(entries_total))?;
        }

        debug!(count = challenges.len(), "Restored tracker");
        Ok(Self { challenges })
    }

    /// Insert a challenge at the end of the collection.
    ///
    /// Inserting an id that is already present is a no-op: the stored challenge
    /// is kept as is. Returns whether the challenge was inserted.
    pub fn add_challenge(&mut self, challenge: SavingsChallenge) -> bool {
        if self.challenges.iter().any(|c| c.id == challenge.id) {
            debug!(id = %challenge.id, "Challenge already present, ignoring insert");
            return false;
        }

        info!(id = %challenge.id, name = %challenge.name, "Added savings challenge");
        self.challenges.push(challenge);
        true
    }

    /// Replace the stored challenge with the same id, keeping its position.
    /// Unknown ids leave the tracker unchanged and report `ChallengeNotFound`.
    pub fn update_challenge(&mut self, challenge: SavingsChallenge) -> Result<(), StoreError> {
        let slot = self.get_mut(challenge.id)?;
        *slot = challenge;
        info!(id = %slot.id, name = %slot.name, "Updated savings challenge");
        Ok(())
    }

    /// Remove a challenge and its entries.
    /// Unknown ids leave the tracker unchanged and report `ChallengeNotFound`.
    pub fn delete_challenge(&mut self, id: ChallengeId) -> Result<SavingsChallenge, StoreError> {
        let index = self
            .challenges
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::ChallengeNotFound(id))?;

        let removed = self.challenges.remove(index);
        info!(id = %id, name = %removed.name, "Deleted savings challenge");
        Ok(removed)
    }

    /// Record a contribution towards a challenge.
    ///
    /// The entry is placed at the head of the challenge's history and the
    /// current amount grows by `amount_cents`. Both happen together or, on
    /// error, not at all.
    pub fn add_saving_entry(
        &mut self,
        challenge_id: ChallengeId,
        amount_cents: Cents,
        note: Option<String>,
        date: DateTime<Utc>,
    ) -> Result<SavingEntry, StoreError> {
        if amount_cents <= 0 {
            warn!(%challenge_id, amount_cents, "Rejected saving entry with non-positive amount");
            return Err(StoreError::InvalidAmount(amount_cents));
        }

        let current = self
            .get(challenge_id)
            .ok_or(StoreError::ChallengeNotFound(challenge_id))?
            .current_amount_cents;
        let fits = current.checked_add(amount_cents).is_some()
            && self.total_saved().checked_add(amount_cents).is_some();
        if !fits {
            warn!(%challenge_id, amount_cents, "Rejected saving entry that would overflow the total");
            return Err(StoreError::AmountOverflow(amount_cents));
        }

        let challenge = self.get_mut(challenge_id)?;

        let mut entry = SavingEntry::new(amount_cents, date);
        entry.note = note;
        challenge.push_entry(entry.clone());

        info!(
            %challenge_id,
            amount_cents,
            current_amount_cents = challenge.current_amount_cents,
            "Added saving entry"
        );
        Ok(entry)
    }

    /// All challenges in creation order. The result is a copy.
    pub fn list_challenges(&self) -> Vec<SavingsChallenge> {
        self.challenges.clone()
    }

    pub fn get(&self, id: ChallengeId) -> Option<&SavingsChallenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    /// Sum of saved amounts across every challenge. Inserts keep it within [`Cents`].
    pub fn total_saved(&self) -> Cents {
        self.challenges.iter().map(|c| c.current_amount_cents).sum()
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    fn get_mut(&mut self, id: ChallengeId) -> Result<&mut SavingsChallenge, StoreError> {
        self.challenges
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::ChallengeNotFound(id))
    }
}
