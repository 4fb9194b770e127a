use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::MovieId;

/// Scoring strategy used to produce recommendations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Similarity of movie attributes (genres, era)
    Content,
    /// Similarity of rating patterns across users
    Collaborative,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Content => write!(f, "content"),
            Strategy::Collaborative => write!(f, "collaborative"),
        }
    }
}

/// A candidate movie with the score a strategy assigned to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMovie {
    pub movie_id: MovieId,
    pub score: f64,
}

impl ScoredMovie {
    pub fn new(movie_id: MovieId, score: f64) -> Self {
        Self { movie_id, score }
    }
}

/// Request for a ranked list of movies similar to three favourites
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub strategy: Strategy,
    /// Titles of the user's favourite movies, exactly three
    pub movies: Vec<String>,
    /// Length of the returned list; falls back to the configured default
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// One entry of a recommendation list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedTitle {
    /// 1-based position in the list
    pub rank: usize,
    pub movie_id: MovieId,
    pub title: String,
    pub score: f64,
}

/// Ordered recommendation list, best match first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub strategy: Strategy,
    pub recommendations: Vec<RankedTitle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_serialization() {
        assert_eq!(serde_json::to_string(&Strategy::Content).unwrap(), "\"content\"");
        assert_eq!(
            serde_json::to_string(&Strategy::Collaborative).unwrap(),
            "\"collaborative\""
        );
    }

    #[test]
    fn test_request_top_n_is_optional() {
        let request: RecommendationRequest = serde_json::from_str(
            r#"{"strategy":"collaborative","movies":["A","B","C"]}"#,
        )
        .unwrap();
        assert_eq!(request.strategy, Strategy::Collaborative);
        assert_eq!(request.movies.len(), 3);
        assert_eq!(request.top_n, None);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let result = serde_json::from_str::<RecommendationRequest>(
            r#"{"strategy":"hybrid","movies":["A","B","C"]}"#,
        );
        assert!(result.is_err());
    }
}
