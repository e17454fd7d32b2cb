use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use boardrent_catalog::Game;
use boardrent_core::{CustomerId, DomainError, DomainResult, Entity, GameId, RentalId};

/// Observable states of a rental.
///
/// `Active` holds one unit of the game's stock; `Returned` has a return
/// date and a delay fee. Deletion is terminal and leaves nothing to
/// observe, so it has no variant here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalState {
    Active,
    Returned,
}

/// Entity: one rental of one unit of a game to a customer.
///
/// Invariants maintained by construction and [`Rental::close`]:
/// - `days_rented` is positive and never changes.
/// - `return_date` and `delay_fee` are either both absent (open) or both
///   present (closed); the transition happens exactly once.
/// - `original_price` is `days_rented * price_per_day` at creation time
///   and is never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rental {
    id: RentalId,
    customer_id: CustomerId,
    game_id: GameId,
    rent_date: NaiveDate,
    days_rented: u32,
    return_date: Option<NaiveDate>,
    original_price: i64,
    delay_fee: Option<i64>,
}

impl Rental {
    /// Open a new rental of `game` starting `today`.
    ///
    /// Fixes `original_price` from the game's current price; later catalog
    /// changes do not touch existing rentals.
    pub fn open(
        id: RentalId,
        customer_id: CustomerId,
        game: &Game,
        days_rented: u32,
        today: NaiveDate,
    ) -> DomainResult<Self> {
        if days_rented == 0 {
            return Err(DomainError::invalid_input("daysRented must be greater than zero"));
        }

        Ok(Self {
            id,
            customer_id,
            game_id: game.id_typed(),
            rent_date: today,
            days_rented,
            return_date: None,
            original_price: i64::from(days_rented) * game.price_per_day(),
            delay_fee: None,
        })
    }

    /// Rebuild a rental from already-persisted fields, skipping validation.
    ///
    /// For gateway row mapping only.
    #[allow(clippy::too_many_arguments)]
    pub fn from_record(
        id: RentalId,
        customer_id: CustomerId,
        game_id: GameId,
        rent_date: NaiveDate,
        days_rented: u32,
        return_date: Option<NaiveDate>,
        original_price: i64,
        delay_fee: Option<i64>,
    ) -> Self {
        Self {
            id,
            customer_id,
            game_id,
            rent_date,
            days_rented,
            return_date,
            original_price,
            delay_fee,
        }
    }

    /// Close the rental: set the return date and the assessed fee.
    ///
    /// One-shot; a second close fails with `AlreadyReturned` and changes
    /// nothing.
    pub fn close(&mut self, return_date: NaiveDate, delay_fee: i64) -> DomainResult<()> {
        if self.return_date.is_some() {
            return Err(DomainError::AlreadyReturned);
        }

        self.return_date = Some(return_date);
        self.delay_fee = Some(delay_fee);
        Ok(())
    }

    pub fn id_typed(&self) -> RentalId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    pub fn rent_date(&self) -> NaiveDate {
        self.rent_date
    }

    pub fn days_rented(&self) -> u32 {
        self.days_rented
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn original_price(&self) -> i64 {
        self.original_price
    }

    pub fn delay_fee(&self) -> Option<i64> {
        self.delay_fee
    }

    pub fn state(&self) -> RentalState {
        if self.return_date.is_none() {
            RentalState::Active
        } else {
            RentalState::Returned
        }
    }

    /// Whether this rental still occupies a unit of stock.
    pub fn is_active(&self) -> bool {
        self.state() == RentalState::Active
    }
}

impl Entity for Rental {
    type Id = RentalId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
