//! Thin orchestrators between the list controller and the repository.
//!
//! Each use case wraps its repository call in an [`Outcome`], so callers never
//! see a propagated error: failures come back as [`Outcome::Error`].

use crate::error::FlickError;
use crate::repository::MovieRepository;
use crate::types::MoviePage;

/// Minimum query length in chars before suggestions are looked up.
pub const MIN_SUGGESTION_QUERY_LEN: usize = 2;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Outcome of an asynchronous operation.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Error(FlickError),
    #[allow(dead_code)]
    Loading,
}

impl<T> From<crate::error::Result<T>> for Outcome<T> {
    fn from(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) => Outcome::Error(e),
        }
    }
}

pub fn long_enough_for_suggestions(query: &str) -> bool {
    !query.trim().is_empty() && query.chars().count() >= MIN_SUGGESTION_QUERY_LEN
}

#[derive(Debug, Clone)]
pub struct GetPopularMovies {
    repository: MovieRepository,
}

impl GetPopularMovies {
    pub fn new(repository: MovieRepository) -> Self {
        Self { repository }
    }

    pub async fn call(&self, page: u32) -> Outcome<MoviePage> {
        let result = self.repository.popular_movies(page).await;
        if let Err(e) = &result {
            tracing::warn!(page, error = %e, "popular movies request failed");
        }
        result.into()
    }
}

#[derive(Debug, Clone)]
pub struct SearchMovies {
    repository: MovieRepository,
}

impl SearchMovies {
    pub fn new(repository: MovieRepository) -> Self {
        Self { repository }
    }

    pub async fn call(&self, query: &str, page: u32) -> Outcome<MoviePage> {
        if query.trim().is_empty() {
            return Outcome::Error(FlickError::InvalidArgument(
                "Search query cannot be empty".to_string(),
            ));
        }
        let result = self.repository.search_movies(query, page).await;
        if let Err(e) = &result {
            tracing::warn!(query, page, error = %e, "search request failed");
        }
        result.into()
    }
}

#[derive(Debug, Clone)]
pub struct GetSearchSuggestions {
    repository: MovieRepository,
}

impl GetSearchSuggestions {
    pub fn new(repository: MovieRepository) -> Self {
        Self { repository }
    }

    /// Up to `limit` distinct titles from the first search page, in the
    /// order the catalog returned them.
    pub async fn call(&self, query: &str, limit: usize) -> Outcome<Vec<String>> {
        if !long_enough_for_suggestions(query) {
            return Outcome::Success(Vec::new());
        }

        match self.repository.search_movies(query, 1).await {
            Ok(page) => {
                let mut titles: Vec<String> = Vec::new();
                for title in page.movies().iter().take(limit).filter_map(|m| m.title()) {
                    if !titles.iter().any(|t| t == title) {
                        titles.push(title.to_string());
                    }
                }
                Outcome::Success(titles)
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "suggestion request failed");
                Outcome::Error(e)
            }
        }
    }
}

/// The three use cases the list controller drives.
#[derive(Debug, Clone)]
pub struct MovieUseCases {
    pub popular: GetPopularMovies,
    pub search: SearchMovies,
    pub suggestions: GetSearchSuggestions,
}

impl MovieUseCases {
    pub fn new(repository: MovieRepository) -> Self {
        Self {
            popular: GetPopularMovies::new(repository.clone()),
            search: SearchMovies::new(repository.clone()),
            suggestions: GetSearchSuggestions::new(repository),
        }
    }
}
