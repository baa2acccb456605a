use super::money::Money;
use super::participant::ParticipantId;
use crate::error::{Result, TripError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub u32);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why an expense was refused by the balance engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidExpenseReason {
    #[error("amount {0} is negative")]
    NegativeAmount(Money),
    #[error("no participants to split over")]
    NoParticipants,
}

/// One recorded payment, with references already resolved to participant ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    #[serde(default)]
    pub description: String,
    pub amount: Money,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub payer: ParticipantId,
    /// May contain duplicates; see [`Expense::distinct_participants`].
    pub participants: Vec<ParticipantId>,
    /// When the expense was recorded against its trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Expense {
    /// Creates an expense in the default currency.
    ///
    /// An empty `participants` list means the payer alone shares the cost.
    pub fn new(
        id: u32,
        description: impl Into<String>,
        amount: Money,
        payer: ParticipantId,
        participants: Vec<ParticipantId>,
    ) -> Self {
        let participants = if participants.is_empty() {
            vec![payer.clone()]
        } else {
            participants
        };
        Self {
            id: ExpenseId(id),
            description: description.into(),
            amount,
            currency: default_currency(),
            payer,
            participants,
            recorded_at: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(at);
        self
    }

    pub fn distinct_participants(&self) -> BTreeSet<&ParticipantId> {
        self.participants.iter().collect()
    }

    /// Contract check run by the balance engine before touching any totals.
    pub fn check(&self) -> Result<BTreeSet<&ParticipantId>> {
        if self.amount.is_negative() {
            return Err(self.invalid(InvalidExpenseReason::NegativeAmount(self.amount)));
        }
        let participants = self.distinct_participants();
        if participants.is_empty() {
            return Err(self.invalid(InvalidExpenseReason::NoParticipants));
        }
        Ok(participants)
    }

    fn invalid(&self, reason: InvalidExpenseReason) -> TripError {
        TripError::InvalidExpense {
            expense: self.id,
            reason,
        }
    }
}
