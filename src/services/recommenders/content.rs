//! Content-based filtering
//!
//! Every movie is described by a bag of tokens: its genres and, when the
//! release year is known, its decade. Tokens are weighted by smoothed inverse
//! document frequency so that rare genres count for more than "Drama", and
//! each vector is L2-normalised once at build time.
//!
//! A candidate's score is the sum of its cosine similarities to the three
//! favourites.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::instrument;

use super::{favourite_positions, rank_by_score, Recommender};
use crate::{
    data::Catalog,
    error::AppResult,
    models::{Movie, MovieId, ScoredMovie, Strategy},
};

/// Sparse unit vector, sorted by token index
type TokenVector = Vec<(usize, f64)>;

pub struct ContentRecommender {
    catalog: Arc<Catalog>,
    vectors: Vec<TokenVector>,
}

fn tokens(movie: &Movie) -> Vec<String> {
    let mut tokens: Vec<String> = movie.genres.iter().map(|g| g.to_lowercase()).collect();
    if let Some(year) = movie.year {
        tokens.push(format!("decade:{}", year - year.rem_euclid(10)));
    }
    tokens.sort();
    tokens.dedup();
    tokens
}

impl ContentRecommender {
    /// Builds token vectors for the whole catalog
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        let movie_tokens: Vec<Vec<usize>> = catalog
            .movies()
            .iter()
            .map(|movie| {
                tokens(movie)
                    .into_iter()
                    .map(|token| {
                        let next = vocabulary.len();
                        let index = *vocabulary.entry(token).or_insert(next);
                        if index == document_frequency.len() {
                            document_frequency.push(0);
                        }
                        document_frequency[index] += 1;
                        index
                    })
                    .collect()
            })
            .collect();

        let n = catalog.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = movie_tokens
            .into_iter()
            .map(|indices| {
                let mut vector: TokenVector = indices.into_iter().map(|i| (i, idf[i])).collect();
                vector.sort_by_key(|(i, _)| *i);
                let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    vector.iter_mut().for_each(|(_, w)| *w /= norm);
                }
                vector
            })
            .collect();

        tracing::info!(
            movie_count = catalog.len(),
            vocabulary_size = vocabulary.len(),
            "Content model built"
        );

        Self { catalog, vectors }
    }

    /// Cosine similarity between two catalog positions
    fn similarity(&self, a: usize, b: usize) -> f64 {
        dot(&self.vectors[a], &self.vectors[b])
    }
}

/// Dot product of two sorted sparse vectors
fn dot(a: &TokenVector, b: &TokenVector) -> f64 {
    let (mut i, mut j, mut sum) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

impl Recommender for ContentRecommender {
    fn strategy(&self) -> Strategy {
        Strategy::Content
    }

    #[instrument(skip(self), fields(strategy = "content"))]
    fn recommend(&self, favourites: &[MovieId], top_n: usize) -> AppResult<Vec<ScoredMovie>> {
        let favourite_positions = favourite_positions(&self.catalog, favourites)?;
        let exclude: HashSet<usize> = favourite_positions.iter().copied().collect();

        let scored: Vec<(usize, f64)> = (0..self.catalog.len())
            .filter(|pos| !exclude.contains(pos))
            .map(|pos| {
                let score = favourite_positions
                    .iter()
                    .map(|&fav| self.similarity(pos, fav))
                    .sum();
                (pos, score)
            })
            .collect();

        let ranked = rank_by_score(&self.catalog, scored, &exclude, top_n);
        tracing::debug!(returned = ranked.len(), "Content recommendations scored");
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u32, title: &str, genres: &str) -> Movie {
        Movie::from_columns(MovieId(id), title, genres)
    }

    fn sci_fi_catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            movie(1, "Alien (1979)", "Horror|Sci-Fi"),
            movie(2, "Aliens (1986)", "Action|Horror|Sci-Fi"),
            movie(3, "Terminator, The (1984)", "Action|Sci-Fi"),
            movie(4, "Notting Hill (1999)", "Comedy|Romance"),
            movie(5, "Predator (1987)", "Action|Sci-Fi|Thriller"),
            movie(6, "Sense and Sensibility (1995)", "Drama|Romance"),
            movie(7, "Terminator 2: Judgment Day (1991)", "Action|Sci-Fi"),
            movie(8, "Toy Story (1995)", "Adventure|Animation|Children|Comedy|Fantasy"),
            movie(9, "Heat (1995)", "Action|Crime|Thriller"),
            movie(10, "Clueless (1995)", "Comedy|Romance"),
            movie(11, "Babe (1995)", "Children|Drama"),
            movie(12, "Casino (1995)", "Crime|Drama"),
            movie(13, "Nixon (1995)", "Drama"),
            movie(14, "Balto (1995)", "Adventure|Animation|Children"),
            movie(15, "Cosmos", "(no genres listed)"),
        ]))
    }

    const FAVOURITES: [MovieId; 3] = [MovieId(1), MovieId(2), MovieId(3)];

    #[test]
    fn test_genre_neighbours_rank_first() {
        let recommender = ContentRecommender::new(sci_fi_catalog());
        let ranked = recommender.recommend(&FAVOURITES, 10).unwrap();

        let top_two: HashSet<MovieId> = ranked.iter().take(2).map(|s| s.movie_id).collect();
        assert_eq!(top_two, HashSet::from([MovieId(5), MovieId(7)]));
        assert!(ranked[0].score >= ranked[1].score);
    }

    #[test]
    fn test_returns_exactly_top_n_without_favourites_or_duplicates() {
        let recommender = ContentRecommender::new(sci_fi_catalog());
        let ranked = recommender.recommend(&FAVOURITES, 10).unwrap();

        assert_eq!(ranked.len(), 10);
        let ids: HashSet<MovieId> = ranked.iter().map(|s| s.movie_id).collect();
        assert_eq!(ids.len(), 10);
        assert!(FAVOURITES.iter().all(|f| !ids.contains(f)));
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_zero_scores_follow_catalog_order() {
        let recommender = ContentRecommender::new(sci_fi_catalog());
        let ranked = recommender.recommend(&FAVOURITES, 12).unwrap();

        let zero_ids: Vec<MovieId> = ranked
            .iter()
            .filter(|s| s.score == 0.0)
            .map(|s| s.movie_id)
            .collect();
        let mut sorted = zero_ids.clone();
        sorted.sort();
        assert_eq!(zero_ids, sorted);
        assert!(zero_ids.contains(&MovieId(15)));
    }

    #[test]
    fn test_small_catalog_returns_what_it_has() {
        let catalog = Arc::new(Catalog::new(vec![
            movie(1, "A (2000)", "Drama"),
            movie(2, "B (2000)", "Drama"),
            movie(3, "C (2000)", "Drama"),
            movie(4, "D (2000)", "Drama"),
        ]));
        let ranked = ContentRecommender::new(catalog)
            .recommend(&[MovieId(1), MovieId(2), MovieId(3)], 10)
            .unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].movie_id, MovieId(4));
    }

    #[test]
    fn test_identical_movies_have_unit_similarity() {
        let recommender = ContentRecommender::new(sci_fi_catalog());
        // Terminator and Terminator 2 share genres but not decade
        assert!((recommender.similarity(2, 2) - 1.0).abs() < 1e-9);
        assert!(recommender.similarity(2, 6) < 1.0);
        assert_eq!(recommender.similarity(0, 3), 0.0);
    }

    #[test]
    fn test_unknown_favourite_is_rejected() {
        let recommender = ContentRecommender::new(sci_fi_catalog());
        assert!(recommender
            .recommend(&[MovieId(1), MovieId(2), MovieId(404)], 10)
            .is_err());
    }
}
