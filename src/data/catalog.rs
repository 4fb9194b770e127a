use std::collections::HashMap;
use std::ops::Range;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieId},
};

/// Read-only movie catalog
///
/// Keeps movies in file order (the order selection windows slice into) and
/// indexes them by id and by case-folded title for explicit lookups.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
    by_id: HashMap<MovieId, usize>,
    by_title: HashMap<String, usize>,
}

fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

impl Catalog {
    /// Builds the catalog; on duplicate ids or titles the first row wins
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut by_id = HashMap::with_capacity(movies.len());
        let mut by_title = HashMap::with_capacity(movies.len());
        let mut duplicate_ids = 0usize;
        let mut duplicate_titles = 0usize;

        let movies: Vec<Movie> = movies
            .into_iter()
            .filter(|movie| {
                if by_id.contains_key(&movie.id) {
                    duplicate_ids += 1;
                    false
                } else {
                    by_id.insert(movie.id, by_id.len());
                    true
                }
            })
            .collect();

        for (index, movie) in movies.iter().enumerate() {
            if by_title.contains_key(&title_key(&movie.title)) {
                duplicate_titles += 1;
                continue;
            }
            by_title.insert(title_key(&movie.title), index);
        }

        if duplicate_ids > 0 || duplicate_titles > 0 {
            tracing::warn!(
                duplicate_ids,
                duplicate_titles,
                "Catalog contains duplicates, keeping first occurrence"
            );
        }

        Self {
            movies,
            by_id,
            by_title,
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All movies in catalog order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Titles in catalog order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.by_id.get(&id).map(|&index| &self.movies[index])
    }

    /// Position of a movie in catalog order
    pub fn position(&self, id: MovieId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Looks a movie up by title, ignoring case and surrounding whitespace
    pub fn resolve(&self, title: &str) -> AppResult<&Movie> {
        self.by_title
            .get(&title_key(title))
            .map(|&index| &self.movies[index])
            .ok_or_else(|| AppError::UnknownTitle(title.trim().to_string()))
    }

    /// Slice of the catalog, clamped to its bounds
    pub fn window(&self, range: Range<usize>) -> &[Movie] {
        let end = range.end.min(self.movies.len());
        let start = range.start.min(end);
        &self.movies[start..end]
    }

    /// Title lists for the favourite pickers, one per window
    pub fn selection_options(&self, windows: &[Range<usize>]) -> Vec<Vec<String>> {
        windows
            .iter()
            .map(|range| {
                self.window(range.clone())
                    .iter()
                    .map(|m| m.title.clone())
                    .collect()
            })
            .collect()
    }

    /// Case-insensitive substring search in catalog order
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Movie> {
        let needle = title_key(query);
        self.movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u32, title: &str) -> Movie {
        Movie::from_columns(MovieId(id), title, "Drama")
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            movie(1, "Heat (1995)"),
            movie(2, "Casino (1995)"),
            movie(3, "Sabrina (1995)"),
            movie(4, "Sabrina (1954)"),
        ])
    }

    #[test]
    fn test_resolve_ignores_case_and_whitespace() {
        let catalog = catalog();
        assert_eq!(catalog.resolve("  heat (1995) ").unwrap().id, MovieId(1));
    }

    #[test]
    fn test_resolve_unknown_title() {
        let err = catalog().resolve("Ronin (1998)").unwrap_err();
        assert!(matches!(err, AppError::UnknownTitle(t) if t == "Ronin (1998)"));
    }

    #[test]
    fn test_duplicates_keep_first() {
        let catalog = Catalog::new(vec![
            movie(1, "Heat (1995)"),
            movie(1, "Heat again"),
            movie(2, "HEAT (1995)"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(MovieId(1)).unwrap().title, "Heat (1995)");
        assert_eq!(catalog.resolve("Heat (1995)").unwrap().id, MovieId(1));
        assert_eq!(catalog.position(MovieId(2)), Some(1));
    }

    #[test]
    fn test_window_clamps_to_catalog() {
        let catalog = catalog();
        assert_eq!(catalog.window(1..3).len(), 2);
        assert_eq!(catalog.window(2..100).len(), 2);
        assert!(catalog.window(50..60).is_empty());
    }

    #[test]
    fn test_selection_options() {
        let options = catalog().selection_options(&[0..1, 2..4, 14930..15200]);
        assert_eq!(options.len(), 3);
        assert_eq!(options[0], vec!["Heat (1995)"]);
        assert_eq!(options[1], vec!["Sabrina (1995)", "Sabrina (1954)"]);
        assert!(options[2].is_empty());
    }

    #[test]
    fn test_search_substring_in_order() {
        let catalog = catalog();
        let found: Vec<MovieId> = catalog.search("sabrina", 10).iter().map(|m| m.id).collect();
        assert_eq!(found, vec![MovieId(3), MovieId(4)]);
        assert_eq!(catalog.search("1995", 2).len(), 2);
    }
}
