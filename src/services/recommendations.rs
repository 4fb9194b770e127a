use std::collections::HashSet;

use crate::{
    data::Catalog,
    error::{AppError, AppResult},
    models::{MovieId, RankedTitle, RecommendationRequest, RecommendationResponse},
    services::recommenders::RecommenderRegistry,
};

/// Number of favourite movies a request must name
pub const FAVOURITE_COUNT: usize = 3;

/// Bounds applied to the requested list length
#[derive(Debug, Clone, Copy)]
pub struct RecommendationLimits {
    pub default_top_n: usize,
    pub max_top_n: usize,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            default_top_n: 10,
            max_top_n: 50,
        }
    }
}

/// Generates a ranked recommendation list for three favourite titles
///
/// Validates the request, resolves the titles against the catalog and hands
/// the resulting ids to the requested strategy. The strategy's output is
/// checked before it is returned: ids outside the catalog, favourites and
/// repeats are dropped, and the list is cut to `top_n`.
pub fn recommend(
    catalog: &Catalog,
    registry: &RecommenderRegistry,
    limits: RecommendationLimits,
    request: RecommendationRequest,
) -> AppResult<RecommendationResponse> {
    let top_n = validate(&request, limits)?;

    let favourites: Vec<MovieId> = request
        .movies
        .iter()
        .map(|title| catalog.resolve(title).map(|movie| movie.id))
        .collect::<AppResult<_>>()?;

    let recommender = registry.get(request.strategy)?;

    tracing::info!(
        strategy = %request.strategy,
        favourites = ?favourites,
        top_n,
        "Generating recommendations"
    );

    let scored = recommender.recommend(&favourites, top_n)?;
    let returned = scored.len();

    let mut seen: HashSet<MovieId> = favourites.iter().copied().collect();
    let recommendations: Vec<RankedTitle> = scored
        .into_iter()
        .filter(|s| seen.insert(s.movie_id))
        .filter_map(|s| {
            catalog
                .get(s.movie_id)
                .map(|movie| (s.movie_id, movie.title.clone(), s.score))
        })
        .take(top_n)
        .enumerate()
        .map(|(index, (movie_id, title, score))| RankedTitle {
            rank: index + 1,
            movie_id,
            title,
            score,
        })
        .collect();

    if recommendations.len() < returned.min(top_n) {
        tracing::warn!(
            strategy = %request.strategy,
            returned,
            kept = recommendations.len(),
            "Dropped invalid entries from strategy output"
        );
    }

    tracing::info!(
        strategy = %request.strategy,
        count = recommendations.len(),
        "Recommendations generated"
    );

    Ok(RecommendationResponse {
        strategy: request.strategy,
        recommendations,
    })
}

/// Checks the request shape and returns the effective `top_n`
fn validate(request: &RecommendationRequest, limits: RecommendationLimits) -> AppResult<usize> {
    if request.movies.len() != FAVOURITE_COUNT {
        return Err(AppError::InvalidInput(format!(
            "Expected exactly {} movies, got {}",
            FAVOURITE_COUNT,
            request.movies.len()
        )));
    }

    let distinct: HashSet<String> = request
        .movies
        .iter()
        .map(|title| title.trim().to_lowercase())
        .collect();
    if distinct.len() != FAVOURITE_COUNT {
        return Err(AppError::InvalidInput(
            "Favourite movies must be distinct".to_string(),
        ));
    }

    let top_n = request.top_n.unwrap_or(limits.default_top_n);
    if top_n == 0 || top_n > limits.max_top_n {
        return Err(AppError::InvalidInput(format!(
            "top_n must be between 1 and {}",
            limits.max_top_n
        )));
    }

    Ok(top_n)
}
