use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nr_core::{ArticleSummary, Error};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub preferences: Vec<String>,
    pub n: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    /// Preferences actually used, after default substitution
    pub preferences: Vec<String>,
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub trained: bool,
    pub corpus_size: usize,
}

/// Maps a core error onto an HTTP status and a `{"error": ..}` body.
pub struct ApiError(pub Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::EmptyCorpus(_) => StatusCode::CONFLICT,
            Error::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::UntrainedEngine => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

/// Never fails: an untrained engine or unmatched preferences give an empty
/// or weakly ranked list.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendRequest>,
) -> Json<RecommendResponse> {
    let mut preferences: Vec<String> = request
        .preferences
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect();
    if preferences.is_empty() {
        preferences = state.settings.default_preferences.clone();
    }
    let n = request.n.unwrap_or(state.settings.default_limit);

    let articles = state
        .engine
        .recommend(&preferences, n)
        .await
        .iter()
        .map(ArticleSummary::from)
        .collect::<Vec<_>>();
    info!("🎯 {} recommendations for {:?}", articles.len(), preferences);

    Json(RecommendResponse {
        preferences,
        articles,
    })
}

/// Reload the corpus snapshot and retrain. The previous model keeps serving
/// if anything goes wrong.
pub async fn retrain(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let corpus = state.storage.load_corpus().await.map_err(|e| {
        error!("❌ Could not load corpus from {} storage: {}", state.storage.name(), e);
        e
    })?;

    if let Err(e) = state.engine.train(corpus).await {
        warn!("🧠 Retrain rejected: {}", e);
        return Err(e.into());
    }
    Ok(health(State(state)).await)
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        trained: state.engine.is_trained().await,
        corpus_size: state.engine.corpus_size().await,
    })
}
