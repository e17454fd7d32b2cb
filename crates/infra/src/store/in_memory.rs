use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;

use boardrent_catalog::Game;
use boardrent_core::{CustomerId, GameId, RentalId, StoreError};
use boardrent_parties::Customer;
use boardrent_rentals::{Admission, Rental, RentalStore, RentalWithNames};

use crate::directory::DirectoryStore;

#[derive(Debug, Default)]
struct State {
    games: HashMap<GameId, Game>,
    customers: HashMap<CustomerId, Customer>,
    rentals: HashMap<RentalId, Rental>,
}

impl State {
    fn active_count(&self, game_id: GameId) -> i64 {
        self.rentals
            .values()
            .filter(|r| r.game_id() == game_id && r.is_active())
            .count() as i64
    }
}

/// In-memory persistence gateway.
///
/// Intended for tests/dev. All state sits behind a single `RwLock`, so the
/// count-vs-stock check and the rental insert in `insert_rental` are one
/// atomic unit under the write lock.
#[derive(Debug, Default)]
pub struct InMemoryRentalStore {
    state: RwLock<State>,
}

impl InMemoryRentalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a game into the catalog (there is no catalog write endpoint).
    pub fn put_game(&self, game: Game) {
        self.state
            .write()
            .expect("lock poisoned")
            .games
            .insert(game.id_typed(), game);
    }

    /// Seed a customer directly, bypassing the cpf-uniqueness check.
    pub fn put_customer(&self, customer: Customer) {
        self.state
            .write()
            .expect("lock poisoned")
            .customers
            .insert(customer.id_typed(), customer);
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))
    }
}

#[async_trait]
impl RentalStore for InMemoryRentalStore {
    async fn get_game(&self, id: GameId) -> Result<Option<Game>, StoreError> {
        Ok(self.read()?.games.get(&id).cloned())
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self.read()?.customers.get(&id).cloned())
    }

    async fn count_active_rentals(&self, game_id: GameId) -> Result<i64, StoreError> {
        Ok(self.read()?.active_count(game_id))
    }

    async fn insert_rental(&self, rental: &Rental) -> Result<Admission, StoreError> {
        let mut state = self.write()?;

        let stock_total = state
            .games
            .get(&rental.game_id())
            .map(|g| i64::from(g.stock_total()))
            .ok_or_else(|| StoreError::backend("rental references an unknown game"))?;

        if state.active_count(rental.game_id()) >= stock_total {
            return Ok(Admission::Exhausted);
        }

        state.rentals.insert(rental.id_typed(), rental.clone());
        Ok(Admission::Granted)
    }

    async fn get_rental(&self, id: RentalId) -> Result<Option<Rental>, StoreError> {
        Ok(self.read()?.rentals.get(&id).cloned())
    }

    async fn update_rental_on_return(
        &self,
        id: RentalId,
        return_date: NaiveDate,
        delay_fee: i64,
    ) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.rentals.get_mut(&id) {
            Some(rental) => Ok(rental.close(return_date, delay_fee).is_ok()),
            None => Ok(false),
        }
    }

    async fn delete_rental(&self, id: RentalId) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        let deletable = state.rentals.get(&id).is_some_and(|r| !r.is_active());
        if deletable {
            state.rentals.remove(&id);
        }
        Ok(deletable)
    }

    async fn list_rentals_with_names(&self) -> Result<Vec<RentalWithNames>, StoreError> {
        let state = self.read()?;

        let mut rows = Vec::with_capacity(state.rentals.len());
        for rental in state.rentals.values() {
            let customer_name = state
                .customers
                .get(&rental.customer_id())
                .map(|c| c.name().to_string())
                .unwrap_or_default();
            let game_name = state
                .games
                .get(&rental.game_id())
                .map(|g| g.name().to_string())
                .unwrap_or_default();
            rows.push(RentalWithNames {
                rental: rental.clone(),
                customer_name,
                game_name,
            });
        }

        // HashMap iteration order is arbitrary; ids are time-ordered (v7).
        rows.sort_by_key(|r| *r.rental.id_typed().as_uuid());
        Ok(rows)
    }
}

#[async_trait]
impl DirectoryStore for InMemoryRentalStore {
    async fn insert_customer(&self, customer: &Customer) -> Result<(), StoreError> {
        let mut state = self.write()?;

        if state.customers.values().any(|c| c.cpf() == customer.cpf()) {
            return Err(StoreError::Conflict(format!(
                "cpf {} is already registered",
                customer.cpf()
            )));
        }

        state.customers.insert(customer.id_typed(), customer.clone());
        Ok(())
    }

    async fn update_customer(&self, customer: &Customer) -> Result<bool, StoreError> {
        let mut state = self.write()?;

        if !state.customers.contains_key(&customer.id_typed()) {
            return Ok(false);
        }
        let cpf_taken = state
            .customers
            .values()
            .any(|c| c.cpf() == customer.cpf() && c.id_typed() != customer.id_typed());
        if cpf_taken {
            return Err(StoreError::Conflict(format!(
                "cpf {} belongs to another customer",
                customer.cpf()
            )));
        }

        state.customers.insert(customer.id_typed(), customer.clone());
        Ok(true)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let mut customers: Vec<Customer> = self.read()?.customers.values().cloned().collect();
        customers.sort_by_key(|c| *c.id_typed().as_uuid());
        Ok(customers)
    }

    async fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        let mut games: Vec<Game> = self.read()?.games.values().cloned().collect();
        games.sort_by_key(|g| *g.id_typed().as_uuid());
        Ok(games)
    }
}
