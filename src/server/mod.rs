use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::storage::SqliteStore;

pub mod page;
pub mod routes;

/// Server state
pub struct AppState {
    pub store: SqliteStore,
}

pub fn router(store: SqliteStore) -> Router {
    let state = Arc::new(AppState { store });

    Router::new()
        .route("/", get(routes::home))
        .route("/api/stats", get(routes::get_stats))
        .route("/api/{table}", get(routes::list_rows))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16, store: SqliteStore) -> anyhow::Result<()> {
    let app = router(store);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
