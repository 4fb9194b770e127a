use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Catalog identifier of a movie (the `movieId` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u32);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Genre marker used by the catalog for movies without genres
const NO_GENRES: &str = "(no genres listed)";

/// A movie in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
}

impl Movie {
    /// Builds a movie from raw catalog columns
    ///
    /// `genres` is the pipe-separated genre column. The release year is taken
    /// from a trailing `(YYYY)` in the title when present.
    pub fn from_columns(id: MovieId, title: &str, genres: &str) -> Self {
        let title = title.trim().to_string();
        let year = parse_year(&title);
        let genres = genres
            .split('|')
            .map(str::trim)
            .filter(|g| !g.is_empty() && *g != NO_GENRES)
            .map(str::to_string)
            .collect();

        Self {
            id,
            title,
            year,
            genres,
        }
    }
}

/// Extracts the year from titles like `"Heat (1995)"`
fn parse_year(title: &str) -> Option<i32> {
    let inner = title.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let digits = &inner[open + 1..];
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
