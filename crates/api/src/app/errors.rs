use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use boardrent_core::{DomainError, StoreError};

/// Map a core failure onto a status code.
///
/// One convention throughout: caller errors are 400, missing resources
/// 404, uniqueness conflicts 409, storage faults 500. `create` remaps
/// `NotFound` to 400 at the call site (an unknown customer or game in the
/// request body is a caller error, not a missing resource).
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_input", msg),
        DomainError::NotFound(what) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
        }
        DomainError::StockExhausted => json_error(
            StatusCode::BAD_REQUEST,
            "stock_exhausted",
            "no stock available for the requested game",
        ),
        DomainError::AlreadyReturned => json_error(
            StatusCode::BAD_REQUEST,
            "already_returned",
            "rental already returned",
        ),
        DomainError::StillActive => json_error(
            StatusCode::BAD_REQUEST,
            "still_active",
            "rental has not been returned",
        ),
        DomainError::Storage(e) => store_error_to_response(e),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Backend(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_failure", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
