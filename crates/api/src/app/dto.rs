use serde::Deserialize;

use boardrent_catalog::Game;
use boardrent_parties::Customer;
use boardrent_rentals::RentalWithNames;

// -------------------------
// Request DTOs
// -------------------------
//
// Identifiers and dates arrive as strings and are parsed in the handlers,
// so a malformed value is a 400 rather than a deserializer rejection.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRentalRequest {
    pub customer_id: String,
    pub game_id: String,
    pub days_rented: i64,
}

#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub phone: String,
    pub cpf: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub birthday: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn rental_to_json(row: &RentalWithNames) -> serde_json::Value {
    let r = &row.rental;
    serde_json::json!({
        "id": r.id_typed().to_string(),
        "customerId": r.customer_id().to_string(),
        "gameId": r.game_id().to_string(),
        "rentDate": r.rent_date().to_string(),
        "daysRented": r.days_rented(),
        "returnDate": r.return_date().map(|d| d.to_string()),
        "originalPrice": r.original_price(),
        "delayFee": r.delay_fee(),
        "customer": {
            "id": r.customer_id().to_string(),
            "name": row.customer_name,
        },
        "game": {
            "id": r.game_id().to_string(),
            "name": row.game_name,
        },
    })
}

pub fn customer_to_json(customer: &Customer) -> serde_json::Value {
    serde_json::json!({
        "id": customer.id_typed().to_string(),
        "name": customer.name(),
        "phone": customer.phone(),
        "cpf": customer.cpf().as_str(),
        "birthday": customer.birthday().to_string(),
    })
}

pub fn game_to_json(game: &Game) -> serde_json::Value {
    serde_json::json!({
        "id": game.id_typed().to_string(),
        "name": game.name(),
        "image": game.image(),
        "stockTotal": game.stock_total(),
        "pricePerDay": game.price_per_day(),
    })
}
