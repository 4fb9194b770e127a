//! Pluggable recommendation strategies
//!
//! Each strategy is fitted once at startup against the read-only catalog and
//! then answers `recommend` calls without mutation, so one instance is shared
//! across all requests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{
    data::Catalog,
    error::{AppError, AppResult},
    models::{MovieId, ScoredMovie, Strategy},
};

pub mod collaborative;
pub mod content;

pub use collaborative::CollaborativeRecommender;
pub use content::ContentRecommender;

/// A scoring strategy
///
/// Implementations return at most `top_n` movies ranked by descending score,
/// never one of the favourites and never the same movie twice. Ties are
/// broken by catalog order so the output is deterministic.
#[cfg_attr(test, mockall::automock)]
pub trait Recommender: Send + Sync {
    /// Strategy this recommender implements
    fn strategy(&self) -> Strategy;

    /// Ranks catalog movies against the user's favourites
    fn recommend(&self, favourites: &[MovieId], top_n: usize) -> AppResult<Vec<ScoredMovie>>;
}

/// Loaded strategies, keyed by the strategy they implement
#[derive(Clone, Default)]
pub struct RecommenderRegistry {
    recommenders: HashMap<Strategy, Arc<dyn Recommender>>,
}

impl RecommenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a recommender, replacing any previous one for its strategy
    pub fn register(&mut self, recommender: Arc<dyn Recommender>) {
        let strategy = recommender.strategy();
        if self.recommenders.insert(strategy, recommender).is_some() {
            tracing::warn!(strategy = %strategy, "Replacing registered recommender");
        }
    }

    pub fn with(mut self, recommender: Arc<dyn Recommender>) -> Self {
        self.register(recommender);
        self
    }

    /// Returns the recommender for `strategy`, or `ModelUnavailable`
    pub fn get(&self, strategy: Strategy) -> AppResult<Arc<dyn Recommender>> {
        self.recommenders
            .get(&strategy)
            .cloned()
            .ok_or(AppError::ModelUnavailable(strategy))
    }

    /// Loaded strategies in a stable order
    pub fn strategies(&self) -> Vec<Strategy> {
        [Strategy::Content, Strategy::Collaborative]
            .into_iter()
            .filter(|s| self.recommenders.contains_key(s))
            .collect()
    }
}

/// Maps favourites to catalog positions, rejecting ids the catalog lacks
pub(crate) fn favourite_positions(
    catalog: &Catalog,
    favourites: &[MovieId],
) -> AppResult<Vec<usize>> {
    favourites
        .iter()
        .map(|id| {
            catalog.position(*id).ok_or_else(|| {
                AppError::InvalidInput(format!("Movie {} is not in the catalog", id))
            })
        })
        .collect()
}

/// Sorts `(catalog position, score)` pairs by descending score, then catalog
/// order, dropping excluded positions and duplicates, and keeps `top_n`
pub(crate) fn rank_by_score(
    catalog: &Catalog,
    mut scored: Vec<(usize, f64)>,
    exclude: &HashSet<usize>,
    top_n: usize,
) -> Vec<ScoredMovie> {
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut seen = HashSet::new();
    scored
        .into_iter()
        .filter(|(pos, _)| !exclude.contains(pos) && seen.insert(*pos))
        .take(top_n)
        .map(|(pos, score)| ScoredMovie::new(catalog.movies()[pos].id, score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;

    fn catalog(n: u32) -> Catalog {
        Catalog::new(
            (1..=n)
                .map(|id| Movie::from_columns(MovieId(id), &format!("Movie {}", id), "Drama"))
                .collect(),
        )
    }

    #[test]
    fn test_registry_reports_missing_strategy() {
        let registry = RecommenderRegistry::new();
        let err = registry.get(Strategy::Collaborative).err().unwrap();
        assert!(matches!(err, AppError::ModelUnavailable(Strategy::Collaborative)));
    }

    #[test]
    fn test_registry_strategies_in_stable_order() {
        let mut collaborative = MockRecommender::new();
        collaborative.expect_strategy().return_const(Strategy::Collaborative);
        let mut content = MockRecommender::new();
        content.expect_strategy().return_const(Strategy::Content);

        let registry = RecommenderRegistry::new()
            .with(Arc::new(collaborative))
            .with(Arc::new(content));

        assert_eq!(
            registry.strategies(),
            vec![Strategy::Content, Strategy::Collaborative]
        );
        assert!(registry.get(Strategy::Content).is_ok());
    }

    #[test]
    fn test_rank_by_score_breaks_ties_by_catalog_order() {
        let catalog = catalog(5);
        let exclude = HashSet::from([0]);
        let ranked = rank_by_score(
            &catalog,
            vec![(4, 0.5), (0, 0.9), (3, 0.5), (1, 0.1), (3, 0.5)],
            &exclude,
            3,
        );
        let ids: Vec<MovieId> = ranked.iter().map(|s| s.movie_id).collect();
        assert_eq!(ids, vec![MovieId(4), MovieId(5), MovieId(2)]);
    }

    #[test]
    fn test_favourite_positions_rejects_unknown_id() {
        let catalog = catalog(3);
        assert_eq!(
            favourite_positions(&catalog, &[MovieId(3), MovieId(1)]).unwrap(),
            vec![2, 0]
        );
        assert!(favourite_positions(&catalog, &[MovieId(99)]).is_err());
    }
}
