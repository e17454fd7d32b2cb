//! Black-box tests: the full HTTP surface over an ephemeral listener,
//! backed by the in-memory gateway.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde_json::json;

use boardrent_api::app::services::AppServices;
use boardrent_catalog::Game;
use boardrent_core::{CustomerId, GameId};
use boardrent_infra::InMemoryRentalStore;
use boardrent_parties::{Cpf, Customer};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Build the prod router over a seeded in-memory store and bind it to
    /// an ephemeral port.
    async fn spawn(store: Arc<InMemoryRentalStore>) -> Self {
        let services = Arc::new(AppServices::from_store(store));
        let app = boardrent_api::app::build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn seeded_store(stock_total: u32, price_per_day: i64) -> (Arc<InMemoryRentalStore>, CustomerId, GameId) {
    let store = Arc::new(InMemoryRentalStore::new());

    let game_id = GameId::new();
    store.put_game(Game::new(game_id, "Catan", "http://img.example/catan.png", stock_total, price_per_day).unwrap());

    let customer_id = CustomerId::new();
    store.put_customer(
        Customer::new(
            customer_id,
            "Joana",
            "21998765432",
            Cpf::parse("12345678901").unwrap(),
            NaiveDate::from_ymd_opt(1990, 5, 20).unwrap(),
        )
        .unwrap(),
    );

    (store, customer_id, game_id)
}

async fn error_code(res: reqwest::Response) -> String {
    let body: serde_json::Value = res.json().await.unwrap();
    body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn health_endpoint_is_live() {
    let (store, _, _) = seeded_store(1, 100);
    let srv = TestServer::spawn(store).await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn rental_lifecycle_over_http() {
    let (store, customer_id, game_id) = seeded_store(3, 1500);
    let srv = TestServer::spawn(store).await;
    let client = reqwest::Client::new();

    // Create.
    let res = client
        .post(format!("{}/rentals", srv.base_url))
        .json(&json!({
            "customerId": customer_id.to_string(),
            "gameId": game_id.to_string(),
            "daysRented": 4,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let rental_id = body["id"].as_str().unwrap().to_string();

    // Listed as open, joined with names, priced at days * price.
    let res = client.get(format!("{}/rentals", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    let row = &items[0];
    assert_eq!(row["id"], rental_id.as_str());
    assert_eq!(row["daysRented"], 4);
    assert_eq!(row["originalPrice"], 6000);
    assert!(row["returnDate"].is_null());
    assert!(row["delayFee"].is_null());
    assert_eq!(row["customer"]["name"], "Joana");
    assert_eq!(row["game"]["name"], "Catan");

    // Deleting while open is rejected.
    let res = client
        .delete(format!("{}/rentals/{}", srv.base_url, rental_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "still_active");

    // Return (same day, no delay).
    let res = client
        .post(format!("{}/rentals/{}/return", srv.base_url, rental_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(format!("{}/rentals", srv.base_url)).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let row = &body["items"][0];
    assert!(row["returnDate"].is_string());
    assert_eq!(row["delayFee"], 0);

    // A second return is rejected.
    let res = client
        .post(format!("{}/rentals/{}/return", srv.base_url, rental_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "already_returned");

    // Delete, then the record is gone.
    let res = client
        .delete(format!("{}/rentals/{}", srv.base_url, rental_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(format!("{}/rentals", srv.base_url)).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["items"].as_array().unwrap().is_empty());

    let res = client
        .delete(format!("{}/rentals/{}", srv.base_url, rental_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_bad_input_with_400() {
    let (store, customer_id, game_id) = seeded_store(3, 1500);
    let srv = TestServer::spawn(store).await;
    let client = reqwest::Client::new();

    // Non-positive period.
    let res = client
        .post(format!("{}/rentals", srv.base_url))
        .json(&json!({
            "customerId": customer_id.to_string(),
            "gameId": game_id.to_string(),
            "daysRented": 0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "invalid_input");

    // Unknown customer: caller error, not 404.
    let res = client
        .post(format!("{}/rentals", srv.base_url))
        .json(&json!({
            "customerId": CustomerId::new().to_string(),
            "gameId": game_id.to_string(),
            "daysRented": 2,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "unknown_reference");

    // Malformed id.
    let res = client
        .post(format!("{}/rentals", srv.base_url))
        .json(&json!({
            "customerId": "not-a-uuid",
            "gameId": game_id.to_string(),
            "daysRented": 2,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "invalid_id");

    // Nothing was written.
    let res = client.get(format!("{}/rentals", srv.base_url)).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn exhausted_stock_maps_to_400() {
    let (store, customer_id, game_id) = seeded_store(1, 100);
    let srv = TestServer::spawn(store).await;
    let client = reqwest::Client::new();

    let payload = json!({
        "customerId": customer_id.to_string(),
        "gameId": game_id.to_string(),
        "daysRented": 3,
    });

    let res = client
        .post(format!("{}/rentals", srv.base_url))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/rentals", srv.base_url))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "stock_exhausted");
}

#[tokio::test]
async fn return_of_unknown_rental_is_404() {
    let (store, _, _) = seeded_store(1, 100);
    let srv = TestServer::spawn(store).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!(
            "{}/rentals/{}/return",
            srv.base_url,
            boardrent_core::RentalId::new()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn customer_registry_round_trip() {
    let (store, _, _) = seeded_store(1, 100);
    let srv = TestServer::spawn(store).await;
    let client = reqwest::Client::new();

    // Register.
    let res = client
        .post(format!("{}/customers", srv.base_url))
        .json(&json!({
            "name": "Carlos",
            "phone": "1130004000",
            "cpf": "98765432100",
            "birthday": "1985-12-01",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let id = body["id"].as_str().unwrap().to_string();

    // Same cpf again conflicts.
    let res = client
        .post(format!("{}/customers", srv.base_url))
        .json(&json!({
            "name": "Outro",
            "phone": "1130004001",
            "cpf": "98765432100",
            "birthday": "1991-01-15",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Invalid cpf is a validation failure.
    let res = client
        .post(format!("{}/customers", srv.base_url))
        .json(&json!({
            "name": "Outro",
            "phone": "1130004001",
            "cpf": "123",
            "birthday": "1991-01-15",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Fetch by id.
    let res = client
        .get(format!("{}/customers/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Carlos");
    assert_eq!(body["birthday"], "1985-12-01");

    // Update.
    let res = client
        .put(format!("{}/customers/{}", srv.base_url, id))
        .json(&json!({
            "name": "Carlos A.",
            "phone": "1130004000",
            "cpf": "98765432100",
            "birthday": "1985-12-01",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Unknown id on update is 404.
    let res = client
        .put(format!("{}/customers/{}", srv.base_url, CustomerId::new()))
        .json(&json!({
            "name": "Ghost",
            "phone": "1130004002",
            "cpf": "11122233344",
            "birthday": "1990-01-01",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn games_catalog_is_readable() {
    let (store, _, game_id) = seeded_store(3, 1500);
    let srv = TestServer::spawn(store).await;

    let res = reqwest::get(format!("{}/games", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], game_id.to_string());
    assert_eq!(items[0]["stockTotal"], 3);
    assert_eq!(items[0]["pricePerDay"], 1500);
}
