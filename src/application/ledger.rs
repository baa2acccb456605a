use crate::application::engine::BalanceEngine;
use crate::domain::balance::Balances;
use crate::domain::expense::{Expense, ExpenseId};
use crate::domain::participant::ParticipantId;
use crate::domain::ports::TripStoreBox;
use crate::domain::trip::{Trip, TripId};
use crate::error::{Result, TripError};
use chrono::Utc;
use tokio::sync::Mutex;

/// Trip use cases on top of a [`TripStore`](crate::domain::ports::TripStore).
///
/// Every change is validated against the trip before it is stored, so the
/// snapshots handed to the [`BalanceEngine`] only reference trip members.
/// Mutations are serialized through a lock to keep read-modify-write cycles
/// on a trip document from interleaving. Reads do not take the lock.
pub struct TripLedger {
    store: TripStoreBox,
    engine: BalanceEngine,
    writes: Mutex<()>,
}

impl TripLedger {
    pub fn new(store: TripStoreBox) -> Self {
        Self {
            store,
            engine: BalanceEngine::default(),
            writes: Mutex::new(()),
        }
    }

    pub fn with_engine(mut self, engine: BalanceEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Creates a new trip. Fails if a trip with the same id exists.
    pub async fn create_trip<I>(&self, id: TripId, name: &str, members: I) -> Result<Trip>
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        self.create_trip_from(Trip::new(id, name).with_members(members))
            .await
    }

    /// Stores a trip built by the caller, e.g. with a description and
    /// dates. Fails if a trip with the same id exists.
    pub async fn create_trip_from(&self, trip: Trip) -> Result<Trip> {
        let _guard = self.writes.lock().await;
        if self.store.get(&trip.id).await?.is_some() {
            return Err(TripError::ValidationError(format!(
                "Trip {} already exists",
                trip.id
            )));
        }

        self.store.store(trip.clone()).await?;
        tracing::info!(trip = %trip.id, members = trip.members.len(), "trip created");
        Ok(trip)
    }

    /// Returns the trip, creating it first if needed, with `members` added.
    pub async fn ensure_trip<I>(&self, id: TripId, name: &str, members: I) -> Result<Trip>
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        let _guard = self.writes.lock().await;
        let mut trip = match self.store.get(&id).await? {
            Some(trip) => trip,
            None => {
                tracing::info!(trip = %id, "trip created");
                Trip::new(id, name)
            }
        };

        for member in members {
            if trip.add_member(member.clone()) {
                tracing::debug!(trip = %trip.id, member = %member, "member added");
            }
        }

        self.store.store(trip.clone()).await?;
        Ok(trip)
    }

    pub async fn trip(&self, id: &TripId) -> Result<Trip> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| TripError::TripNotFound(id.clone()))
    }

    /// Deletes a trip on behalf of `requester`, who must be a member.
    pub async fn delete_trip(&self, trip_id: &TripId, requester: &ParticipantId) -> Result<Trip> {
        let _guard = self.writes.lock().await;
        let trip = self.member_trip(trip_id, requester).await?;
        self.store.delete(trip_id).await?;
        tracing::info!(trip = %trip_id, by = %requester, "trip deleted");
        Ok(trip)
    }

    /// The trip's expenses, newest first, for a member of the trip.
    pub async fn expenses(
        &self,
        trip_id: &TripId,
        requester: &ParticipantId,
    ) -> Result<Vec<Expense>> {
        let trip = self.member_trip(trip_id, requester).await?;
        Ok(trip.expenses_newest_first().into_iter().cloned().collect())
    }

    async fn member_trip(&self, trip_id: &TripId, requester: &ParticipantId) -> Result<Trip> {
        let trip = self.trip(trip_id).await?;
        if !trip.is_member(requester) {
            return Err(TripError::NotAMember {
                trip: trip.id,
                participant: requester.clone(),
            });
        }
        Ok(trip)
    }

    /// Trips the participant is a member of, ordered by trip id.
    pub async fn trips_for(&self, participant: &ParticipantId) -> Result<Vec<Trip>> {
        let mut trips: Vec<Trip> = self
            .store
            .all_trips()
            .await?
            .into_iter()
            .filter(|trip| trip.is_member(participant))
            .collect();
        trips.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(trips)
    }

    /// Adds a member, returning `false` if they already belonged to the trip.
    pub async fn add_member(&self, trip_id: &TripId, participant: ParticipantId) -> Result<bool> {
        let _guard = self.writes.lock().await;
        let mut trip = self.trip(trip_id).await?;
        let added = trip.add_member(participant);
        if added {
            self.store.store(trip).await?;
        }
        Ok(added)
    }

    /// Records one expense. Returns `false` if its id was already recorded.
    pub async fn record_expense(&self, trip_id: &TripId, expense: Expense) -> Result<bool> {
        let _guard = self.writes.lock().await;
        let mut trip = self.trip(trip_id).await?;
        let added = trip.add_expense(stamped(expense))?;
        if added {
            self.store.store(trip).await?;
        }
        Ok(added)
    }

    /// Records a batch of expenses with a single load and store of the trip.
    ///
    /// Expenses that fail validation are skipped and their errors returned;
    /// the rest are kept. Duplicate ids are ignored silently.
    pub async fn record_expenses<I>(
        &self,
        trip_id: &TripId,
        expenses: I,
    ) -> Result<Vec<TripError>>
    where
        I: IntoIterator<Item = Expense>,
    {
        let _guard = self.writes.lock().await;
        let mut trip = self.trip(trip_id).await?;
        let mut rejected = Vec::new();
        let mut recorded = 0usize;

        for expense in expenses {
            let id = expense.id;
            match trip.add_expense(stamped(expense)) {
                Ok(true) => recorded += 1,
                Ok(false) => {
                    tracing::debug!(trip = %trip_id, expense = %id, "duplicate expense ignored")
                }
                Err(e) => {
                    tracing::debug!(trip = %trip_id, expense = %id, error = %e, "expense rejected");
                    rejected.push(e);
                }
            }
        }

        if recorded > 0 {
            self.store.store(trip).await?;
        }
        tracing::info!(trip = %trip_id, recorded, rejected = rejected.len(), "expenses recorded");
        Ok(rejected)
    }

    /// Deletes an expense on behalf of `requester`, who must be its payer.
    pub async fn delete_expense(
        &self,
        trip_id: &TripId,
        expense: ExpenseId,
        requester: &ParticipantId,
    ) -> Result<Expense> {
        let _guard = self.writes.lock().await;
        let mut trip = self.trip(trip_id).await?;
        let removed = trip.remove_expense(expense, requester)?;
        self.store.store(trip).await?;
        Ok(removed)
    }

    /// Computes balances for the trip's current members and expenses.
    pub async fn balances(&self, trip_id: &TripId) -> Result<Balances> {
        let trip = self.trip(trip_id).await?;
        let balances = self.engine.compute_balances(&trip.members, &trip.expenses)?;
        tracing::debug!(
            trip = %trip_id,
            members = balances.len(),
            expenses = trip.expenses.len(),
            "balances computed"
        );
        Ok(balances)
    }

    /// Like [`TripLedger::balances`], but only for a member of the trip.
    pub async fn balances_for(
        &self,
        trip_id: &TripId,
        requester: &ParticipantId,
    ) -> Result<Balances> {
        self.member_trip(trip_id, requester).await?;
        self.balances(trip_id).await
    }
}

fn stamped(expense: Expense) -> Expense {
    match expense.recorded_at {
        Some(_) => expense,
        None => expense.with_recorded_at(Utc::now()),
    }
}
