use axum::Router;

pub mod customers;
pub mod games;
pub mod rentals;
pub mod system;

/// Router for all resource endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/rentals", rentals::router())
        .nest("/customers", customers::router())
        .nest("/games", games::router())
}
