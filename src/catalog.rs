use async_trait::async_trait;

use crate::error::Result;
use crate::types::MoviePage;

/// Remote movie catalog. Implemented by the TMDB client and by test doubles.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Web page for a movie, for opening in a browser.
    fn web_url(&self, movie_id: i64) -> String;

    async fn popular_movies(&self, page: u32) -> Result<MoviePage>;
    async fn search_movies(&self, query: &str, page: u32) -> Result<MoviePage>;
}
