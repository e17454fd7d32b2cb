use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;

use boardrent_core::CustomerId;
use boardrent_parties::{Cpf, Customer};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_customer).get(list_customers))
        .route("/:id", get(get_customer).put(update_customer))
}

/// Parse and validate a customer payload into the domain entity.
fn customer_from_request(
    id: CustomerId,
    body: dto::CustomerRequest,
) -> Result<Customer, axum::response::Response> {
    let birthday = NaiveDate::parse_from_str(&body.birthday, "%Y-%m-%d").map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "birthday must be a YYYY-MM-DD date",
        )
    })?;
    let cpf = Cpf::parse(body.cpf).map_err(errors::domain_error_to_response)?;
    Customer::new(id, body.name, body.phone, cpf, birthday)
        .map_err(errors::domain_error_to_response)
}

pub async fn register_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CustomerRequest>,
) -> axum::response::Response {
    let customer = match customer_from_request(CustomerId::new(), body) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match services.store().insert_customer(&customer).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": customer.id_typed().to_string() })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::CustomerRequest>,
) -> axum::response::Response {
    let customer_id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id"),
    };
    let customer = match customer_from_request(customer_id, body) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match services.store().update_customer(&customer).await {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "id": customer_id.to_string() })),
        )
            .into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "customer not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let customer_id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id"),
    };

    match services.store().get_customer(customer_id).await {
        Ok(Some(customer)) => {
            (StatusCode::OK, Json(dto::customer_to_json(&customer))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "customer not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_customers().await {
        Ok(customers) => {
            let items = customers.iter().map(dto::customer_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
