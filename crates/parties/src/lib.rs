//! Parties domain module (registered customers).
//!
//! This crate contains the `Customer` entity and the `Cpf` tax-identifier
//! value object, implemented purely as deterministic domain logic (no IO,
//! no HTTP, no storage). Cpf uniqueness is a storage concern enforced by
//! the gateway.

pub mod customer;

pub use customer::{Cpf, Customer};
