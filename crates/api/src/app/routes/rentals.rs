use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use chrono::Utc;

use boardrent_core::{CustomerId, DomainError, GameId, RentalId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_rental).get(list_rentals))
        .route("/:id/return", post(return_rental))
        .route("/:id", delete(delete_rental))
}

pub async fn create_rental(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateRentalRequest>,
) -> axum::response::Response {
    let customer_id: CustomerId = match body.customer_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id"),
    };
    let game_id: GameId = match body.game_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid game id"),
    };

    let today = Utc::now().date_naive();
    match services
        .rentals()
        .create(customer_id, game_id, body.days_rented, today)
        .await
    {
        Ok(rental_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": rental_id.to_string() })),
        )
            .into_response(),
        // An unknown customer or game in the body is a caller error, not a
        // missing resource.
        Err(e @ DomainError::NotFound(_)) => {
            errors::json_error(StatusCode::BAD_REQUEST, "unknown_reference", e.to_string())
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn return_rental(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let rental_id: RentalId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid rental id"),
    };

    let today = Utc::now().date_naive();
    match services.rentals().return_rental(rental_id, today).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "id": rental_id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_rental(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let rental_id: RentalId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid rental id"),
    };

    match services.rentals().delete(rental_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "id": rental_id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_rentals(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.rentals().list().await {
        Ok(rows) => {
            let items = rows.iter().map(dto::rental_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
