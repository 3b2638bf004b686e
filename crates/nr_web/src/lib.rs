use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use nr_core::Result;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/recommend", post(handlers::recommend))
        .route("/api/retrain", post(handlers::retrain))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::handlers::{HealthResponse, RecommendRequest, RecommendResponse};
    pub use crate::{create_app, serve, AppState};
    pub use nr_core::{ArticleSummary, Error, Result};
}
