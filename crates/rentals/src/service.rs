//! Rental lifecycle orchestration.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::instrument;

use boardrent_core::{CustomerId, DomainError, DomainResult, GameId, RentalId};

use crate::fee::delay_fee;
use crate::ledger::StockLedger;
use crate::rental::Rental;
use crate::store::{Admission, RentalStore, RentalWithNames};

/// Drives the rental state machine: Active → Returned → Deleted.
///
/// Holds no mutable state of its own; the persisted store is the only
/// shared state, reached through the injected gateway.
pub struct RentalService {
    store: Arc<dyn RentalStore>,
    ledger: StockLedger,
}

impl RentalService {
    pub fn new(store: Arc<dyn RentalStore>) -> Self {
        let ledger = StockLedger::new(store.clone());
        Self { store, ledger }
    }

    /// Open a new rental of one unit of `game_id` for `customer_id`.
    ///
    /// Fails with `InvalidInput` for a non-positive period, `NotFound` for
    /// an unknown customer or game, and `StockExhausted` when every unit is
    /// already out; in all three cases nothing is written.
    #[instrument(skip(self), err)]
    pub async fn create(
        &self,
        customer_id: CustomerId,
        game_id: GameId,
        days_rented: i64,
        today: NaiveDate,
    ) -> DomainResult<RentalId> {
        if days_rented <= 0 {
            return Err(DomainError::invalid_input("daysRented must be greater than zero"));
        }
        let days_rented = u32::try_from(days_rented)
            .map_err(|_| DomainError::invalid_input("daysRented out of range"))?;

        let customer = self
            .store
            .get_customer(customer_id)
            .await?
            .ok_or(DomainError::NotFound("customer"))?;
        let game = self
            .store
            .get_game(game_id)
            .await?
            .ok_or(DomainError::NotFound("game"))?;

        let rental = Rental::open(RentalId::new(), customer.id_typed(), &game, days_rented, today)?;

        match self.ledger.try_reserve(&rental).await? {
            Admission::Granted => {
                tracing::info!(rental_id = %rental.id_typed(), game_id = %game_id, "rental opened");
                Ok(rental.id_typed())
            }
            Admission::Exhausted => Err(DomainError::StockExhausted),
        }
    }

    /// Close an open rental as of `today`, assessing the delay fee.
    ///
    /// The return date and the fee are persisted in a single update;
    /// returning an already-closed rental fails with `AlreadyReturned` and
    /// alters neither field.
    #[instrument(skip(self), err)]
    pub async fn return_rental(&self, rental_id: RentalId, today: NaiveDate) -> DomainResult<()> {
        let rental = self
            .store
            .get_rental(rental_id)
            .await?
            .ok_or(DomainError::NotFound("rental"))?;
        if !rental.is_active() {
            return Err(DomainError::AlreadyReturned);
        }

        let game = self
            .store
            .get_game(rental.game_id())
            .await?
            .ok_or(DomainError::NotFound("game"))?;
        let fee = delay_fee(
            rental.rent_date(),
            rental.days_rented(),
            today,
            game.price_per_day(),
        );

        // The update is gated on the row still being open; a concurrent
        // return between the read above and this write loses cleanly.
        if !self.store.update_rental_on_return(rental_id, today, fee).await? {
            return Err(DomainError::AlreadyReturned);
        }

        tracing::info!(rental_id = %rental_id, delay_fee = fee, "rental returned");
        Ok(())
    }

    /// Permanently remove a returned rental.
    ///
    /// Open rentals may not be deleted; they still occupy stock.
    #[instrument(skip(self), err)]
    pub async fn delete(&self, rental_id: RentalId) -> DomainResult<()> {
        let rental = self
            .store
            .get_rental(rental_id)
            .await?
            .ok_or(DomainError::NotFound("rental"))?;
        if rental.is_active() {
            return Err(DomainError::StillActive);
        }

        if !self.store.delete_rental(rental_id).await? {
            return Err(DomainError::NotFound("rental"));
        }

        tracing::info!(rental_id = %rental_id, "rental deleted");
        Ok(())
    }

    /// All rentals enriched with customer and game names. Ordering is
    /// whatever the gateway returns.
    pub async fn list(&self) -> DomainResult<Vec<RentalWithNames>> {
        Ok(self.store.list_rentals_with_names().await?)
    }
}
