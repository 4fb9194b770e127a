pub mod movie;
pub mod rating;
pub mod recommendation;

pub use movie::{Movie, MovieId};
pub use rating::Rating;
pub use recommendation::{
    RankedTitle, RecommendationRequest, RecommendationResponse, ScoredMovie, Strategy,
};
