use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{RecommendationRequest, RecommendationResponse, Strategy},
    routes::AppState,
    services::recommendations,
};

/// Handler for recommendations endpoint
///
/// Scoring is CPU-bound, so it runs on the blocking pool while the request waits.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = payload?;

    tracing::info!(
        request_id = %request_id,
        strategy = %request.strategy,
        movie_count = request.movies.len(),
        "Processing recommendation request"
    );

    let response = tokio::task::spawn_blocking(move || {
        recommendations::recommend(&state.catalog, &state.registry, state.limits, request)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Recommendation task failed: {}", e)))??;

    tracing::info!(
        request_id = %request_id,
        count = response.recommendations.len(),
        "Recommendation request completed"
    );

    Ok(Json(response))
}

/// Handler listing the strategies that are loaded
pub async fn strategies(State(state): State<AppState>) -> Json<Vec<Strategy>> {
    Json(state.registry.strategies())
}
