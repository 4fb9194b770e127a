use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::ops::Range;
use std::sync::Arc;

use anyhow::Context;

use crate::{
    config::Config,
    data::{load_movies, load_ratings, Catalog},
    error::AppError,
    services::{
        recommendations::RecommendationLimits, CollaborativeRecommender, ContentRecommender,
        RecommenderRegistry,
    },
};

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub registry: Arc<RecommenderRegistry>,
    pub limits: RecommendationLimits,
    pub selection_windows: Arc<Vec<Range<usize>>>,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    /// Wraps an already built catalog and registry with default limits
    pub fn new(catalog: Arc<Catalog>, registry: RecommenderRegistry) -> Self {
        Self {
            catalog,
            registry: Arc::new(registry),
            limits: RecommendationLimits::default(),
            selection_windows: Arc::new(Vec::new()),
            loaded_at: Utc::now(),
        }
    }

    pub fn with_limits(mut self, limits: RecommendationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_selection_windows(mut self, windows: Vec<Range<usize>>) -> Self {
        self.selection_windows = Arc::new(windows);
        self
    }

    /// Loads the catalog and fits every strategy whose data is present
    ///
    /// The catalog is required. A missing ratings file only disables
    /// collaborative filtering.
    pub fn load(config: &Config) -> anyhow::Result<Self> {
        let movies = load_movies(&config.movies_path)
            .with_context(|| format!("Failed to load catalog from {}", config.movies_path))?;
        let catalog = Arc::new(Catalog::new(movies));

        let mut registry =
            RecommenderRegistry::new().with(Arc::new(ContentRecommender::new(catalog.clone())));

        match load_ratings(&config.ratings_path) {
            Ok(ratings) => registry.register(Arc::new(CollaborativeRecommender::fit(
                catalog.clone(),
                &ratings,
                config.min_ratings,
            ))),
            Err(AppError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    path = %config.ratings_path,
                    "Ratings file not found, collaborative filtering disabled"
                );
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to load ratings from {}", config.ratings_path)))
            }
        }

        Ok(Self::new(catalog, registry)
            .with_limits(RecommendationLimits {
                default_top_n: config.default_top_n,
                max_top_n: config.max_top_n,
            })
            .with_selection_windows(config.parsed_selection_windows()?))
    }
}
