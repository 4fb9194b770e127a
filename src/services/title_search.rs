use crate::{
    data::Catalog,
    error::{AppError, AppResult},
    models::Movie,
};

/// Default number of search results
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Upper bound on search results per request
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Searches catalog titles for `query`
///
/// Matching is a case-insensitive substring test; results keep catalog
/// order. `limit` is clamped to `MAX_SEARCH_LIMIT`.
pub fn search_titles(
    catalog: &Catalog,
    query: &str,
    limit: Option<usize>,
) -> AppResult<Vec<Movie>> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidInput("Search query must not be empty".to_string()));
    }

    let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(MAX_SEARCH_LIMIT);
    let results: Vec<Movie> = catalog.search(query, limit).into_iter().cloned().collect();

    tracing::debug!(query = %query, result_count = results.len(), "Title search");

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieId;

    fn catalog(n: u32) -> Catalog {
        Catalog::new(
            (1..=n)
                .map(|id| {
                    Movie::from_columns(MovieId(id), &format!("Star Story {} (1990)", id), "Drama")
                })
                .collect(),
        )
    }

    #[test]
    fn test_blank_query_is_invalid() {
        assert!(matches!(
            search_titles(&catalog(3), "   ", None),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_limit_defaults_and_clamps() {
        let catalog = catalog(150);
        assert_eq!(search_titles(&catalog, "star", None).unwrap().len(), DEFAULT_SEARCH_LIMIT);
        assert_eq!(search_titles(&catalog, "star", Some(500)).unwrap().len(), MAX_SEARCH_LIMIT);
        assert_eq!(search_titles(&catalog, " STORY 7 (1990)", Some(5)).unwrap().len(), 1);
    }
}
