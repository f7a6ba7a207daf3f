use thiserror::Error;

use crate::domain::{Cents, ChallengeId, TransactionId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid amount: {0} cents (amounts must be positive)")]
    InvalidAmount(Cents),

    #[error("Savings challenge not found: {0}")]
    ChallengeNotFound(ChallengeId),

    #[error("Amount {0} cents would overflow the running total")]
    AmountOverflow(Cents),

    #[error("Duplicate savings challenge id: {0}")]
    DuplicateChallenge(ChallengeId),

    #[error("Duplicate transaction id in seed data: {0}")]
    DuplicateTransaction(TransactionId),

    #[error("Duplicate transaction sequence number in seed data: {0}")]
    DuplicateSequence(i64),

    #[error(
        "Savings challenge {id} is inconsistent: current amount {current_amount} but entries sum to {entries_total}"
    )]
    InconsistentChallenge {
        id: ChallengeId,
        current_amount: Cents,
        entries_total: Cents,
    },
}
