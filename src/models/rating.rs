use serde::{Deserialize, Serialize};

use super::MovieId;

/// One user's rating of one movie
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub user_id: u32,
    pub movie_id: MovieId,
    pub rating: f32,
}

impl Rating {
    pub fn new(user_id: u32, movie_id: MovieId, rating: f32) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
        }
    }
}
