//! Persistence gateway backends.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryRentalStore;
pub use postgres::PostgresRentalStore;
