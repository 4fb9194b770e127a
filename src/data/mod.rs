pub mod catalog;
pub mod loader;

pub use catalog::Catalog;
pub use loader::{load_movies, load_ratings};
