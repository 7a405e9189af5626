//! HTTP server assembly.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use census_store::PersonStore;

use crate::routes::{PersonsState, person_routes};

/// Build the full application router.
pub fn build_router(store: PersonStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    person_routes(PersonsState::new(store))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind and serve the API until the process is stopped.
pub async fn serve(addr: SocketAddr, store: PersonStore) -> std::io::Result<()> {
    let router = build_router(store);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "census api listening");
    axum::serve(listener, router).await
}
