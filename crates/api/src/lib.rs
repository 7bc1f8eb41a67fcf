pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use cache::Refresher;

/// Shared application state injected into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub refresher: Arc<Refresher>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(refresher: Arc<Refresher>) -> Self {
        Self {
            refresher,
            started_at: Utc::now(),
        }
    }
}

/// Build and run the Axum API server.
pub async fn serve(state: AppState, port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    let app = Router::new()
        .merge(routes::setups_router())
        .merge(routes::health_router())
        .with_state(state)
        .layer(cors)
        .layer(CompressionLayer::new());

    info!(%addr, "API listening");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
