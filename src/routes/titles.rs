use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{error::AppResult, models::Movie, routes::AppState, services::title_search};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    limit: Option<usize>,
}

/// Handler for title search endpoint
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Movie>>> {
    let Query(params) = query?;
    let titles = title_search::search_titles(&state.catalog, &params.q, params.limit)?;
    Ok(Json(titles))
}

/// Handler listing the titles offered for each favourite slot
pub async fn selections(State(state): State<AppState>) -> Json<Vec<Vec<String>>> {
    Json(state.catalog.selection_options(&state.selection_windows))
}
