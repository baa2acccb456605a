use crate::domain::expense::{ExpenseId, InvalidExpenseReason};
use crate::domain::participant::ParticipantId;
use crate::domain::trip::TripId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TripError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    /// A malformed expense reached the balance engine. Upstream validation
    /// should make this unreachable.
    #[error("Invalid expense {expense}: {reason}")]
    InvalidExpense {
        expense: ExpenseId,
        reason: InvalidExpenseReason,
    },
    /// The amounts cannot be totalled within the 28 significant digits of a
    /// `Decimal` without rounding.
    #[error("Expense amounts are too large to total exactly")]
    AmountOutOfRange,
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),
    #[error("Expense {expense} not found in trip {trip}")]
    ExpenseNotFound { trip: TripId, expense: ExpenseId },
    #[error("{participant} is not a member of trip {trip}")]
    NotAMember {
        trip: TripId,
        participant: ParticipantId,
    },
    #[error("{participant} is not allowed to delete expense {expense}")]
    NotAuthorized {
        expense: ExpenseId,
        participant: ParticipantId,
    },
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, TripError>;
