use async_trait::async_trait;
use reqwest::Client;

use crate::catalog::Catalog;
use crate::config::ApiConfig;
use crate::error::{FlickError, Result};
use crate::types::MoviePage;

/// TMDB v3 client. Every request carries the static bearer token.
pub struct Tmdb {
    client: Client,
    base_url: String,
    web_base_url: String,
    language: String,
    token: String,
}

impl std::fmt::Debug for Tmdb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tmdb")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Tmdb {
    pub fn new(api: &ApiConfig, token: String) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(api.timeout())
            .timeout(api.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            web_base_url: api.web_base_url.trim_end_matches('/').to_string(),
            language: api.language.clone(),
            token,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn popular_url(&self, page: u32) -> String {
        self.api_url(&format!(
            "/movie/popular?language={}&page={}",
            urlencoding::encode(&self.language),
            page
        ))
    }

    fn search_url(&self, query: &str, page: u32) -> String {
        self.api_url(&format!(
            "/search/movie?query={}&page={}",
            urlencoding::encode(query),
            page
        ))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(FlickError::Api(format!("TMDB API {}: {}", status, text)));
        }

        response
            .json()
            .await
            .map_err(|e| FlickError::Api(e.to_string()))
    }
}

#[async_trait]
impl Catalog for Tmdb {
    fn name(&self) -> &str {
        "TMDB"
    }

    fn web_url(&self, movie_id: i64) -> String {
        format!("{}/movie/{}", self.web_base_url, movie_id)
    }

    async fn popular_movies(&self, page: u32) -> Result<MoviePage> {
        let url = self.popular_url(page);
        self.get_json(&url).await
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<MoviePage> {
        let url = self.search_url(query, page);
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::types::Movie;

    /// Answer a single HTTP request with `status` and `body`. The task
    /// resolves to the raw request head.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (Tmdb, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        let api = ApiConfig {
            base_url: format!("http://{}/3", addr),
            ..ApiConfig::default()
        };
        (Tmdb::new(&api, "tok".to_string()).unwrap(), server)
    }

    fn client() -> Tmdb {
        let api = ApiConfig {
            base_url: "https://api.themoviedb.org/3/".to_string(),
            ..ApiConfig::default()
        };
        Tmdb::new(&api, "s3cr3t".to_string()).unwrap()
    }

    #[test]
    fn popular_url_includes_language_and_page() {
        assert_eq!(
            client().popular_url(2),
            "https://api.themoviedb.org/3/movie/popular?language=en-US&page=2"
        );
    }

    #[test]
    fn search_url_encodes_query() {
        assert_eq!(
            client().search_url("the matrix & co", 1),
            "https://api.themoviedb.org/3/search/movie?query=the%20matrix%20%26%20co&page=1"
        );
    }

    #[test]
    fn web_url_points_at_movie_page() {
        assert_eq!(
            client().web_url(27205),
            "https://www.themoviedb.org/movie/27205"
        );
    }

    #[tokio::test]
    async fn search_sends_bearer_token_and_accept_header() {
        let (tmdb, server) = serve_once(
            "200 OK",
            r#"{"page":2,"results":[{"id":348,"title":"Alien"}],"total_pages":3}"#,
        )
        .await;

        let page = tmdb.search_movies("a b", 2).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /3/search/movie?query=a%20b&page=2 HTTP/1.1\r\n"));
        let head = request.to_lowercase();
        assert!(head.contains("\r\nauthorization: bearer tok\r\n"));
        assert!(head.contains("\r\naccept: application/json\r\n"));
        assert_eq!(page.page, Some(2));
        assert_eq!(page.total_pages, Some(3));
        assert_eq!(page.movies()[0].title(), Some("Alien"));
    }

    #[tokio::test]
    async fn popular_requests_language_and_page() {
        let (tmdb, server) = serve_once("200 OK", r#"{"results":[]}"#).await;

        let page = tmdb.popular_movies(1).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /3/movie/popular?language=en-US&page=1 HTTP/1.1\r\n"));
        assert!(page.movies().is_empty());
    }

    #[tokio::test]
    async fn non_success_status_becomes_api_error() {
        let (tmdb, server) = serve_once("401 Unauthorized", "bad token").await;

        let err = tmdb.popular_movies(1).await.unwrap_err();
        server.await.unwrap();

        match err {
            FlickError::Api(message) => {
                assert_eq!(message, "TMDB API 401 Unauthorized: bad token")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn null_fields_decode_to_defaults() {
        let (tmdb, server) = serve_once(
            "200 OK",
            r#"{"page":null,"results":[{"id":7,"title":null,"overview":null,"poster_path":null,"release_date":null,"vote_average":null}]}"#,
        )
        .await;

        let page = tmdb.search_movies("x", 1).await.unwrap();
        server.await.unwrap();

        assert_eq!(page.page, None);
        assert_eq!(
            page.movies(),
            [Movie {
                id: 7,
                ..Movie::default()
            }]
        );
        assert_eq!(page.movies()[0].title(), None);
    }

    #[tokio::test]
    async fn malformed_body_becomes_api_error() {
        let (tmdb, server) = serve_once("200 OK", "not json").await;

        let err = tmdb.popular_movies(1).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, FlickError::Api(_)));
    }

    #[test]
    fn debug_hides_token() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("api.themoviedb.org"));
    }
}
