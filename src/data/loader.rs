use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{
    error::AppResult,
    models::{Movie, MovieId, Rating},
};

/// Row of the movie catalog file
#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(rename = "movieId")]
    movie_id: u32,
    title: String,
    #[serde(default)]
    genres: String,
}

/// Row of the ratings file; any extra column (e.g. `timestamp`) is ignored
#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(rename = "userId")]
    user_id: u32,
    #[serde(rename = "movieId")]
    movie_id: u32,
    rating: f32,
}

/// Loads the movie catalog, preserving file order
pub fn load_movies(path: impl AsRef<Path>) -> AppResult<Vec<Movie>> {
    let path = path.as_ref();
    let movies = read_movies(File::open(path)?)?;
    tracing::info!(path = %path.display(), movie_count = movies.len(), "Loaded movie catalog");
    Ok(movies)
}

/// Loads user ratings
pub fn load_ratings(path: impl AsRef<Path>) -> AppResult<Vec<Rating>> {
    let path = path.as_ref();
    let ratings = read_ratings(File::open(path)?)?;
    tracing::info!(path = %path.display(), rating_count = ratings.len(), "Loaded ratings");
    Ok(ratings)
}

/// Parses catalog rows from any reader
pub fn read_movies<R: Read>(reader: R) -> AppResult<Vec<Movie>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut movies = Vec::new();
    for row in csv_reader.deserialize::<MovieRow>() {
        let row = row?;
        movies.push(Movie::from_columns(MovieId(row.movie_id), &row.title, &row.genres));
    }
    Ok(movies)
}

/// Parses rating rows from any reader
pub fn read_ratings<R: Read>(reader: R) -> AppResult<Vec<Rating>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut ratings = Vec::new();
    for row in csv_reader.deserialize::<RatingRow>() {
        let row = row?;
        if !row.rating.is_finite() {
            tracing::warn!(
                user_id = row.user_id,
                movie_id = row.movie_id,
                "Skipping non-finite rating"
            );
            continue;
        }
        ratings.push(Rating::new(row.user_id, MovieId(row.movie_id), row.rating));
    }
    Ok(ratings)
}
