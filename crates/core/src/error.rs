//! Domain and storage error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant except `Storage` is a deterministic business failure: the
/// operation was rejected and nothing was written. `Storage` wraps a fault
/// reported by the persistence gateway.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A value failed validation (e.g. `days_rented <= 0`).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced record does not exist. The payload names what was
    /// looked up ("customer", "game", "rental").
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Every unit of the game's stock is already out on an open rental.
    #[error("no stock available for the requested game")]
    StockExhausted,

    /// The rental has already been returned; `return` is a one-shot
    /// transition.
    #[error("rental already returned")]
    AlreadyReturned,

    /// The rental is still open; open rentals may not be deleted.
    #[error("rental has not been returned")]
    StillActive,

    /// The persistence gateway reported an underlying fault.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(what: &'static str) -> Self {
        Self::NotFound(what)
    }
}

/// Persistence gateway error.
///
/// Storage-agnostic: backends map their native failures onto these two
/// shapes. `Conflict` carries unique-constraint violations (duplicate cpf);
/// everything else is a `Backend` fault surfaced as a 5xx upstream.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("storage failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
