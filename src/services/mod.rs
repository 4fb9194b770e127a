pub mod recommendations;
pub mod recommenders;
pub mod title_search;

pub use recommenders::{
    CollaborativeRecommender, ContentRecommender, Recommender, RecommenderRegistry,
};
