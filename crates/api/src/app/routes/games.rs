use std::sync::Arc;

use axum::{
    Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::get,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", get(list_games))
}

/// Catalog reads only; catalog management has no endpoint.
pub async fn list_games(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().list_games().await {
        Ok(games) => {
            let items = games.iter().map(dto::game_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
