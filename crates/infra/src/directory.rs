//! Registry boilerplate port: customer CRUD and catalog reads.
//!
//! None of this carries rental invariants; the rental core never sees it.
//! It exists so the Request Layer has somewhere storage-agnostic to read
//! and write the records rentals reference.

use async_trait::async_trait;

use boardrent_catalog::Game;
use boardrent_core::StoreError;
use boardrent_parties::Customer;
use boardrent_rentals::RentalStore;

/// Customer registry writes/reads and game catalog reads.
///
/// Cpf uniqueness is enforced here (backends map their native
/// unique-violation onto `StoreError::Conflict`), not in the domain.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Register a customer. `Conflict` when the cpf is already taken.
    async fn insert_customer(&self, customer: &Customer) -> Result<(), StoreError>;

    /// Replace a customer record. Returns `false` for an unknown id;
    /// `Conflict` when the new cpf belongs to a different customer.
    async fn update_customer(&self, customer: &Customer) -> Result<bool, StoreError>;

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError>;

    async fn list_games(&self) -> Result<Vec<Game>, StoreError>;
}

/// Everything the application needs from one storage backend.
pub trait AppStore: RentalStore + DirectoryStore {}

impl<T: RentalStore + DirectoryStore> AppStore for T {}
