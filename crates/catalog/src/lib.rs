//! Game catalog domain module.
//!
//! This crate contains the `Game` entity and its construction rules,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). Catalog management endpoints are out of scope; records enter
//! the catalog through seeding or migrations.

pub mod game;

pub use game::Game;
