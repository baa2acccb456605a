use crate::domain::balance::Balances;
use crate::domain::expense::Expense;
use crate::domain::money::{DECIMAL_DIGITS, Money, SplitRule};
use crate::domain::participant::ParticipantId;
use crate::error::{Result, TripError};
use std::collections::BTreeSet;

/// Computes who owes whom for one trip snapshot.
///
/// `BalanceEngine` holds no state between calls: every invocation starts from
/// the members and expenses it is handed, so it can be shared freely and
/// called concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceEngine {
    split: SplitRule,
}

impl BalanceEngine {
    pub fn new(split: SplitRule) -> Self {
        Self { split }
    }

    /// Returns one [`BalanceEntry`](crate::domain::balance::BalanceEntry) per
    /// member, plus one for every payer or participant that is not a member.
    ///
    /// Each expense is split equally over its distinct participants and the
    /// payer is credited with the full amount. Whatever the split leaves over
    /// is charged to the payer, so the balances always sum to exactly zero.
    /// The share scale comes from [`SplitRule::scale_for`] on the trip total.
    ///
    /// An empty `members` set yields an empty result. A negative amount or an
    /// empty participant list fails the whole computation with
    /// [`TripError::InvalidExpense`]. Amounts whose total needs more than
    /// [`DECIMAL_DIGITS`] significant digits fail with
    /// [`TripError::AmountOutOfRange`].
    pub fn compute_balances(
        &self,
        members: &BTreeSet<ParticipantId>,
        expenses: &[Expense],
    ) -> Result<Balances> {
        if members.is_empty() {
            return Ok(Balances::default());
        }

        let mut balances: Balances = members
            .iter()
            .map(|member| (member.clone(), Default::default()))
            .collect();

        let mut total = Money::ZERO;
        let mut fraction_digits = 0;
        let mut checked = Vec::with_capacity(expenses.len());
        for expense in expenses {
            let participants = expense.check()?;
            total = add(total, expense.amount)?;
            fraction_digits = fraction_digits.max(expense.amount.fraction_digits());
            checked.push((expense, participants));
        }
        if total.integer_digits() + fraction_digits > DECIMAL_DIGITS {
            return Err(TripError::AmountOutOfRange);
        }

        let scale = self.split.scale_for(total);
        for (expense, participants) in checked {
            let (share, residual) = expense.amount.split(participants.len(), scale);

            let payer = balances.entry(&expense.payer);
            payer.paid = add(payer.paid, expense.amount)?;
            payer.owed = add(payer.owed, residual)?;

            for participant in participants {
                let entry = balances.entry(participant);
                entry.owed = add(entry.owed, share)?;
            }
        }

        balances.settle();
        Ok(balances)
    }
}

fn add(acc: Money, amount: Money) -> Result<Money> {
    acc.checked_add(amount).ok_or(TripError::AmountOutOfRange)
}

/// [`BalanceEngine::compute_balances`] with [`SplitRule::Precise`] shares.
pub fn compute_balances(
    members: &BTreeSet<ParticipantId>,
    expenses: &[Expense],
) -> Result<Balances> {
    BalanceEngine::default().compute_balances(members, expenses)
}
