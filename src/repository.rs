use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::types::MoviePage;

/// Pass-through over the remote catalog so the use cases never see the
/// transport.
#[derive(Debug, Clone)]
pub struct MovieRepository {
    catalog: Arc<dyn Catalog>,
}

impl MovieRepository {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    pub fn web_url(&self, movie_id: i64) -> String {
        self.catalog.web_url(movie_id)
    }

    pub async fn popular_movies(&self, page: u32) -> Result<MoviePage> {
        let result = self.catalog.popular_movies(page).await;
        log_page("popular", &result);
        result
    }

    pub async fn search_movies(&self, query: &str, page: u32) -> Result<MoviePage> {
        let result = self.catalog.search_movies(query, page).await;
        log_page("search", &result);
        result
    }
}

fn log_page(kind: &str, result: &Result<MoviePage>) {
    if let Ok(page) = result {
        tracing::debug!(
            kind,
            page = ?page.page,
            results = page.movies().len(),
            total_pages = ?page.total_pages,
            total_results = ?page.total_results,
            "page received"
        );
    }
}
