//! Stock admission over the persistence gateway.

use std::sync::Arc;

use boardrent_core::{GameId, StoreError};

use crate::rental::Rental;
use crate::store::{Admission, RentalStore};

/// Answers whether a new rental of a game may be created, based on the
/// current active-rental count vs. the game's total stock.
///
/// `try_reserve` is the single admission gate for rental creation. The
/// count-vs-stock check and the rental insert happen as one atomic unit
/// inside the gateway (`RentalStore::insert_rental`), so the active count
/// for a game can never exceed its `stock_total`, including under
/// concurrent creations.
pub struct StockLedger {
    store: Arc<dyn RentalStore>,
}

impl StockLedger {
    pub fn new(store: Arc<dyn RentalStore>) -> Self {
        Self { store }
    }

    /// Count of open rentals for `game_id`. Side-effect-free read; only a
    /// snapshot. Admission decisions go through [`StockLedger::try_reserve`].
    pub async fn active_count(&self, game_id: GameId) -> Result<i64, StoreError> {
        self.store.count_active_rentals(game_id).await
    }

    /// Reserve one unit of stock by persisting `rental` if the game still
    /// has a free unit. On `Admission::Exhausted` nothing was written.
    pub async fn try_reserve(&self, rental: &Rental) -> Result<Admission, StoreError> {
        self.store.insert_rental(rental).await
    }
}
