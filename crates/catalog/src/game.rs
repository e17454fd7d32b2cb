use serde::{Deserialize, Serialize};

use boardrent_core::{DomainError, DomainResult, Entity, GameId};

/// Entity: a physical game the shop owns and rents out.
///
/// Immutable once created: stock and price changes have no endpoint, and a
/// rental's `original_price` is fixed at creation regardless of later
/// catalog edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    id: GameId,
    name: String,
    image: String,
    stock_total: u32,
    /// Price per rented day in smallest currency unit (e.g., cents).
    price_per_day: i64,
}

impl Game {
    /// Validated constructor.
    ///
    /// Rejects empty names, zero stock, and non-positive prices.
    pub fn new(
        id: GameId,
        name: impl Into<String>,
        image: impl Into<String>,
        stock_total: u32,
        price_per_day: i64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_input("name cannot be empty"));
        }
        if stock_total == 0 {
            return Err(DomainError::invalid_input("stockTotal must be greater than zero"));
        }
        if price_per_day <= 0 {
            return Err(DomainError::invalid_input("pricePerDay must be greater than zero"));
        }

        Ok(Self {
            id,
            name,
            image: image.into(),
            stock_total,
            price_per_day,
        })
    }

    /// Rebuild a game from already-persisted fields, skipping validation.
    ///
    /// For gateway row mapping only; rows were validated on the way in.
    pub fn from_record(
        id: GameId,
        name: String,
        image: String,
        stock_total: u32,
        price_per_day: i64,
    ) -> Self {
        Self {
            id,
            name,
            image,
            stock_total,
            price_per_day,
        }
    }

    pub fn id_typed(&self) -> GameId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// Total units owned; the ceiling on concurrently open rentals.
    pub fn stock_total(&self) -> u32 {
        self.stock_total
    }

    pub fn price_per_day(&self) -> i64 {
        self.price_per_day
    }
}

impl Entity for Game {
    type Id = GameId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_game_id() -> GameId {
        GameId::new()
    }

    #[test]
    fn new_game_carries_its_fields() {
        let id = test_game_id();
        let game = Game::new(id, "Catan", "https://img.example/catan.png", 3, 1500).unwrap();

        assert_eq!(game.id_typed(), id);
        assert_eq!(game.name(), "Catan");
        assert_eq!(game.stock_total(), 3);
        assert_eq!(game.price_per_day(), 1500);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Game::new(test_game_id(), "   ", "img", 1, 100).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn zero_stock_is_rejected() {
        let err = Game::new(test_game_id(), "Catan", "img", 0, 100).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn non_positive_price_is_rejected() {
        for price in [0, -5] {
            let err = Game::new(test_game_id(), "Catan", "img", 1, price).unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)));
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any non-empty name with positive stock and price
            /// constructs, and the fields round-trip unchanged.
            #[test]
            fn valid_inputs_always_construct(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                stock in 1u32..1000,
                price in 1i64..1_000_000,
            ) {
                let game = Game::new(test_game_id(), name.clone(), "img", stock, price).unwrap();
                prop_assert_eq!(game.name(), name.as_str());
                prop_assert_eq!(game.stock_total(), stock);
                prop_assert_eq!(game.price_per_day(), price);
            }
        }
    }
}
