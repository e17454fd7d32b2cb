use std::sync::Arc;

#[tokio::main]
async fn main() {
    boardrent_observability::init();

    let services = Arc::new(boardrent_api::app::services::build_services().await);
    let app = boardrent_api::app::build_app(services);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap_or_else(|e| panic!("failed to bind 0.0.0.0:{port}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
