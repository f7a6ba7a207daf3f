use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::TransactionKind;
use crate::storage::StoreError;

use super::AuthError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Not signed in")]
    NotAuthenticated,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("No {kind} category with id '{id}'")]
    CategoryNotFound { kind: TransactionKind, id: String },

    #[error("Challenge name cannot be empty")]
    EmptyName,

    #[error("Goal amount must be positive")]
    InvalidGoal,

    #[error("Finish date must be on or after {earliest} (got {finish_date})")]
    FinishDateTooSoon {
        finish_date: DateTime<Utc>,
        earliest: DateTime<Utc>,
    },

    #[error("Saving date {0} is in the future")]
    FutureEntryDate(DateTime<Utc>),

    #[error(transparent)]
    Store(#[from] StoreError),
}
