//! Item-item collaborative filtering
//!
//! Ratings are mean-centred per user, so a movie is represented by how much
//! each user liked it relative to their own average. Two movies are similar
//! when the same users deviate from their averages in the same direction.
//!
//! ## Algorithm
//! 1. For each favourite, walk the users who rated it
//! 2. Accumulate dot products with every other movie those users rated
//! 3. Divide by vector norms to get cosine similarity
//! 4. Sum the positive similarities across favourites
//! 5. Back-fill with the most popular movies when too few candidates remain

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tracing::instrument;

use super::{favourite_positions, rank_by_score, Recommender};
use crate::{
    data::Catalog,
    error::AppResult,
    models::{MovieId, Rating, ScoredMovie, Strategy},
};

/// Pseudo-count pulling sparse means toward the global mean
const POPULARITY_DAMPING: f64 = 5.0;

pub struct CollaborativeRecommender {
    catalog: Arc<Catalog>,
    /// Catalog position → users who rated it, with mean-centred rating
    item_ratings: Vec<Vec<(u32, f64)>>,
    /// User → rated catalog positions, with mean-centred rating
    user_ratings: HashMap<u32, Vec<(usize, f64)>>,
    /// L2 norm of each item's centred rating vector
    item_norms: Vec<f64>,
    /// Rated catalog positions, most popular first
    popularity: Vec<usize>,
    min_ratings: usize,
}

impl CollaborativeRecommender {
    /// Fits the model on `ratings`
    ///
    /// Ratings for movies missing from the catalog are skipped. When a user
    /// rates the same movie more than once the last rating wins.
    pub fn fit(catalog: Arc<Catalog>, ratings: &[Rating], min_ratings: usize) -> Self {
        // Ordered maps keep summation order, and so scores, identical across fits
        let mut raw: BTreeMap<u32, BTreeMap<usize, f64>> = BTreeMap::new();
        let mut skipped = 0usize;

        for rating in ratings {
            match catalog.position(rating.movie_id) {
                Some(pos) => {
                    raw.entry(rating.user_id)
                        .or_default()
                        .insert(pos, f64::from(rating.rating));
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Ignoring ratings for movies outside the catalog");
        }

        let mut item_ratings: Vec<Vec<(u32, f64)>> = vec![Vec::new(); catalog.len()];
        let mut raw_sums = vec![0.0f64; catalog.len()];
        let mut user_ratings: HashMap<u32, Vec<(usize, f64)>> = HashMap::with_capacity(raw.len());
        let (mut global_sum, mut global_count) = (0.0f64, 0usize);

        for (user_id, rated) in raw {
            let mean = rated.values().sum::<f64>() / rated.len() as f64;
            let centred: Vec<(usize, f64)> = rated
                .into_iter()
                .map(|(pos, value)| {
                    raw_sums[pos] += value;
                    global_sum += value;
                    global_count += 1;
                    (pos, value - mean)
                })
                .collect();

            for &(pos, value) in &centred {
                item_ratings[pos].push((user_id, value));
            }
            user_ratings.insert(user_id, centred);
        }

        let item_norms: Vec<f64> = item_ratings
            .iter()
            .map(|users| users.iter().map(|(_, v)| v * v).sum::<f64>().sqrt())
            .collect();

        let global_mean = if global_count > 0 {
            global_sum / global_count as f64
        } else {
            0.0
        };
        let mut popularity: Vec<(usize, f64)> = item_ratings
            .iter()
            .enumerate()
            .filter(|(_, users)| !users.is_empty())
            .map(|(pos, users)| {
                let count = users.len() as f64;
                let damped = (raw_sums[pos] + global_mean * POPULARITY_DAMPING)
                    / (count + POPULARITY_DAMPING);
                (pos, damped)
            })
            .collect();
        popularity.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        tracing::info!(
            user_count = user_ratings.len(),
            rated_movies = popularity.len(),
            rating_count = global_count,
            "Collaborative model fitted"
        );

        Self {
            catalog,
            item_ratings,
            user_ratings,
            item_norms,
            popularity: popularity.into_iter().map(|(pos, _)| pos).collect(),
            min_ratings,
        }
    }

    /// Cosine similarity of `favourite` with every movie co-rated with it
    fn similarities(&self, favourite: usize) -> HashMap<usize, f64> {
        let favourite_norm = self.item_norms[favourite];
        if favourite_norm == 0.0 {
            return HashMap::new();
        }

        let mut dots: HashMap<usize, f64> = HashMap::new();
        for &(user_id, favourite_value) in &self.item_ratings[favourite] {
            if favourite_value == 0.0 {
                continue;
            }
            let Some(rated) = self.user_ratings.get(&user_id) else {
                continue;
            };
            for &(pos, value) in rated {
                if pos != favourite {
                    *dots.entry(pos).or_insert(0.0) += favourite_value * value;
                }
            }
        }

        dots.into_iter()
            .filter_map(|(pos, dot)| {
                let norm = self.item_norms[pos];
                (norm > 0.0).then(|| (pos, dot / (favourite_norm * norm)))
            })
            .collect()
    }
}

impl Recommender for CollaborativeRecommender {
    fn strategy(&self) -> Strategy {
        Strategy::Collaborative
    }

    #[instrument(skip(self), fields(strategy = "collaborative"))]
    fn recommend(&self, favourites: &[MovieId], top_n: usize) -> AppResult<Vec<ScoredMovie>> {
        let favourite_positions = favourite_positions(&self.catalog, favourites)?;
        let exclude: HashSet<usize> = favourite_positions.iter().copied().collect();

        let mut scores: HashMap<usize, f64> = HashMap::new();
        for &favourite in &favourite_positions {
            for (pos, similarity) in self.similarities(favourite) {
                if similarity > 0.0 && self.item_ratings[pos].len() >= self.min_ratings {
                    *scores.entry(pos).or_insert(0.0) += similarity;
                }
            }
        }

        let mut ranked = rank_by_score(
            &self.catalog,
            scores.into_iter().collect(),
            &exclude,
            top_n,
        );
        let from_similarity = ranked.len();

        if ranked.len() < top_n {
            let mut taken: HashSet<usize> = exclude;
            taken.extend(
                ranked
                    .iter()
                    .filter_map(|s| self.catalog.position(s.movie_id)),
            );
            let unrated = (0..self.catalog.len()).filter(|pos| self.item_ratings[*pos].is_empty());
            let backfill = self
                .popularity
                .iter()
                .copied()
                .chain(unrated)
                .filter(|pos| !taken.contains(pos))
                .take(top_n - ranked.len())
                .map(|pos| ScoredMovie::new(self.catalog.movies()[pos].id, 0.0));
            ranked.extend(backfill);
        }

        tracing::debug!(
            from_similarity,
            backfilled = ranked.len() - from_similarity,
            "Collaborative recommendations scored"
        );

        Ok(ranked)
    }
}
