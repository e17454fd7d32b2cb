//! Infrastructure layer: persistence gateway implementations.
//!
//! Two backends implement the ports defined by the domain crates:
//! - [`store::PostgresRentalStore`]: production storage over a `sqlx`
//!   connection pool (schema in `migrations/`).
//! - [`store::InMemoryRentalStore`]: tests and development.
//!
//! Both also implement [`directory::DirectoryStore`] for the customer and
//! catalog registry endpoints, and are usable through the combined
//! [`directory::AppStore`] bound.

pub mod directory;
pub mod store;

pub use directory::{AppStore, DirectoryStore};
pub use store::{InMemoryRentalStore, PostgresRentalStore};
