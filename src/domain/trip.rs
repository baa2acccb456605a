use super::expense::{DEFAULT_CURRENCY, Expense, ExpenseId};
use super::money::Money;
use super::participant::ParticipantId;
use crate::error::{Result, TripError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TripId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A trip document: its members and the expenses recorded against it.
///
/// Every mutation goes through methods that enforce trip membership, so an
/// expense stored here only ever references members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub currency: String,
    pub members: BTreeSet<ParticipantId>,
    pub expenses: Vec<Expense>,
}

impl Trip {
    pub fn new(id: TripId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            start_date: None,
            end_date: None,
            currency: DEFAULT_CURRENCY.to_string(),
            members: BTreeSet::new(),
            expenses: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the travel dates. Fails if the trip would end before it starts.
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            return Err(TripError::ValidationError(format!(
                "Trip {} ends on {} before it starts on {}",
                self.id, end, start
            )));
        }
        self.start_date = start;
        self.end_date = end;
        Ok(self)
    }

    pub fn with_members<I>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        self.members.extend(members);
        self
    }

    /// Adds a member, returning `false` if they already belonged to the trip.
    pub fn add_member(&mut self, participant: ParticipantId) -> bool {
        self.members.insert(participant)
    }

    pub fn is_member(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Expenses ordered newest first. Expenses without a timestamp sort last,
    /// and ties keep the most recently added first.
    pub fn expenses_newest_first(&self) -> Vec<&Expense> {
        let mut expenses: Vec<&Expense> = self.expenses.iter().rev().collect();
        expenses.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        expenses
    }

    /// Sum of all recorded amounts, or `None` if it overflows.
    pub fn total(&self) -> Option<Money> {
        self.expenses
            .iter()
            .try_fold(Money::ZERO, |total, e| total.checked_add(e.amount))
    }

    /// Validates and records an expense.
    ///
    /// Returns `Ok(false)` when an expense with the same id is already
    /// recorded; the new one is ignored.
    pub fn add_expense(&mut self, expense: Expense) -> Result<bool> {
        if self.expense(expense.id).is_some() {
            return Ok(false);
        }
        if expense.amount.is_negative() {
            return Err(TripError::ValidationError(format!(
                "Expense {} has a negative amount",
                expense.id
            )));
        }
        if expense.participants.is_empty() {
            return Err(TripError::ValidationError(format!(
                "Expense {} has no participants",
                expense.id
            )));
        }
        if expense.currency != self.currency {
            return Err(TripError::ValidationError(format!(
                "Expense {} is in {} but trip {} uses {}",
                expense.id, expense.currency, self.id, self.currency
            )));
        }
        if self
            .total()
            .and_then(|total| total.checked_add(expense.amount))
            .is_none()
        {
            return Err(TripError::AmountOutOfRange);
        }
        if let Some(outsider) = std::iter::once(&expense.payer)
            .chain(expense.participants.iter())
            .find(|p| !self.is_member(p))
        {
            return Err(TripError::NotAMember {
                trip: self.id.clone(),
                participant: outsider.clone(),
            });
        }

        self.expenses.push(expense);
        Ok(true)
    }

    /// Removes an expense. Only the member who paid for it may do so.
    pub fn remove_expense(
        &mut self,
        id: ExpenseId,
        requester: &ParticipantId,
    ) -> Result<Expense> {
        let position = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| TripError::ExpenseNotFound {
                trip: self.id.clone(),
                expense: id,
            })?;

        if &self.expenses[position].payer != requester {
            return Err(TripError::NotAuthorized {
                expense: id,
                participant: requester.clone(),
            });
        }

        Ok(self.expenses.remove(position))
    }
}
