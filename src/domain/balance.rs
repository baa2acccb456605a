use super::money::Money;
use super::participant::ParticipantId;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Whether a member is owed money by the group, owes money, or is even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
    Owed,
    Owes,
    Settled,
}

/// One member's totals for a trip.
///
/// Amounts serialize as JSON numbers, which is what presentation layers
/// consume. Stored documents never contain a `BalanceEntry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BalanceEntry {
    /// Sum of the amounts this member paid.
    #[serde(serialize_with = "as_number")]
    pub paid: Money,
    /// Sum of this member's shares.
    #[serde(serialize_with = "as_number")]
    pub owed: Money,
    /// `paid - owed`.
    #[serde(serialize_with = "as_number")]
    pub balance: Money,
}

fn as_number<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    rust_decimal::serde::float::serialize(&money.0, serializer)
}

impl BalanceEntry {
    pub fn standing(&self) -> Standing {
        if self.balance.is_zero() {
            Standing::Settled
        } else if self.balance.is_negative() {
            Standing::Owes
        } else {
            Standing::Owed
        }
    }

    pub(crate) fn settle(&mut self) {
        self.balance = self.paid - self.owed;
    }

    fn rounded(&self, scale: u32) -> Self {
        Self {
            paid: self.paid.round_dp(scale),
            owed: self.owed.round_dp(scale),
            balance: self.balance.round_dp(scale),
        }
    }
}

/// Per-member balances for one trip, ordered by participant id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Balances(BTreeMap<ParticipantId, BalanceEntry>);

impl Balances {
    pub fn get(&self, participant: &ParticipantId) -> Option<&BalanceEntry> {
        self.0.get(participant)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, ParticipantId, BalanceEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_paid(&self) -> Money {
        self.0.values().map(|e| e.paid).sum()
    }

    pub fn total_owed(&self) -> Money {
        self.0.values().map(|e| e.owed).sum()
    }

    /// Sum of all balances. Zero for any computed snapshot.
    pub fn total_balance(&self) -> Money {
        self.0.values().map(|e| e.balance).sum()
    }

    /// Returns a copy rounded to `scale` decimal places for display.
    ///
    /// Rounding each entry on its own can leave the rounded balances a few
    /// minor units off zero; use the unrounded values for any further math.
    pub fn rounded(&self, scale: u32) -> Self {
        Self(
            self.0
                .iter()
                .map(|(id, entry)| (id.clone(), entry.rounded(scale)))
                .collect(),
        )
    }

    pub(crate) fn entry(&mut self, participant: &ParticipantId) -> &mut BalanceEntry {
        self.0.entry(participant.clone()).or_default()
    }

    pub(crate) fn settle(&mut self) {
        self.0.values_mut().for_each(BalanceEntry::settle);
    }
}

impl FromIterator<(ParticipantId, BalanceEntry)> for Balances {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, BalanceEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = (&'a ParticipantId, &'a BalanceEntry);
    type IntoIter = btree_map::Iter<'a, ParticipantId, BalanceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
