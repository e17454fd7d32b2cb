//! Persistence gateway port consumed by the rental core.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use boardrent_catalog::Game;
use boardrent_core::{CustomerId, GameId, RentalId, StoreError};
use boardrent_parties::Customer;

use crate::rental::Rental;

/// Outcome of the atomic admission-and-insert for a new rental.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The rental was persisted; one unit of stock is now reserved.
    Granted,
    /// Every unit of the game's stock was already out; nothing was written.
    Exhausted,
}

/// A rental joined with the display names of its customer and game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RentalWithNames {
    pub rental: Rental,
    pub customer_name: String,
    pub game_name: String,
}

/// Durable storage for games, customers, and rentals.
///
/// Storage-agnostic: `boardrent-infra` provides a Postgres implementation
/// and an in-memory one for tests and development. Implementations must
/// uphold two contracts beyond plain CRUD:
///
/// - `insert_rental` checks the active-rental count against the game's
///   stock and inserts **in one atomic unit**. Two unguarded statements
///   (count, then insert) permit overbooking under concurrent creations
///   and are not a valid implementation.
/// - `update_rental_on_return` and `delete_rental` are row-level
///   read-modify-write operations gated on the rental's current state.
#[async_trait]
pub trait RentalStore: Send + Sync {
    async fn get_game(&self, id: GameId) -> Result<Option<Game>, StoreError>;

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// Count of rentals for `game_id` with no return date.
    async fn count_active_rentals(&self, game_id: GameId) -> Result<i64, StoreError>;

    /// Atomically admit and persist a new (open) rental.
    ///
    /// Admits iff the game's active-rental count is below its `stock_total`
    /// at the instant of the insert; on `Exhausted` no write is performed.
    async fn insert_rental(&self, rental: &Rental) -> Result<Admission, StoreError>;

    async fn get_rental(&self, id: RentalId) -> Result<Option<Rental>, StoreError>;

    /// Persist the Active → Returned transition in a single update.
    ///
    /// Returns `false` (and writes nothing) when the rental is missing or
    /// already has a return date.
    async fn update_rental_on_return(
        &self,
        id: RentalId,
        return_date: NaiveDate,
        delay_fee: i64,
    ) -> Result<bool, StoreError>;

    /// Remove a returned rental. Returns `false` (and writes nothing) when
    /// the rental is missing or still open.
    async fn delete_rental(&self, id: RentalId) -> Result<bool, StoreError>;

    /// All rentals joined with customer and game names, for display.
    async fn list_rentals_with_names(&self) -> Result<Vec<RentalWithNames>, StoreError>;
}
