//! Rental lifecycle domain module — the core of the service.
//!
//! A rental reserves one unit of a game's stock while open, is closed
//! exactly once by a return (which assesses a delay fee), and may only be
//! deleted after it has been closed. This crate owns that state machine,
//! the fee arithmetic, and the admission gate; durable storage is reached
//! through the [`store::RentalStore`] port implemented in `boardrent-infra`.

pub mod fee;
pub mod ledger;
pub mod rental;
pub mod service;
pub mod store;

pub use fee::delay_fee;
pub use ledger::StockLedger;
pub use rental::{Rental, RentalState};
pub use service::RentalService;
pub use store::{Admission, RentalStore, RentalWithNames};
