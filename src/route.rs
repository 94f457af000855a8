use crate::types::Movie;

pub const MOVIE_LIST_ROUTE: &str = "movie_list";
const MOVIE_DETAILS_PREFIX: &str = "movie_details/";

/// Route for the detail screen, carrying the movie as URL-encoded JSON.
pub fn movie_details_route(movie: &Movie) -> String {
    // Serializing a plain struct of strings and numbers cannot fail.
    let json = serde_json::to_string(movie).unwrap_or_default();
    format!("{}{}", MOVIE_DETAILS_PREFIX, urlencoding::encode(&json))
}

/// Decode a detail route back into a movie. Anything malformed yields an
/// empty movie so navigation never fails.
pub fn decode_movie_details(route: &str) -> Movie {
    let Some(encoded) = route.strip_prefix(MOVIE_DETAILS_PREFIX) else {
        tracing::warn!(route, "not a movie details route");
        return Movie::default();
    };

    let json = match urlencoding::decode(encoded) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(error = %e, "undecodable movie route");
            return Movie::default();
        }
    };

    serde_json::from_str(&json).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid movie in route");
        Movie::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> Movie {
        Movie {
            id: 27205,
            title: "Inception: 10/10 & \"mind-bending\"".to_string(),
            overview: "Dreams within dreams? Yes.".to_string(),
            poster_path: Some("/9gk7adHYeDvHkCSEqAvQNLV5Uge.jpg".to_string()),
            release_date: "2010-07-15".to_string(),
            vote_average: 8.4,
        }
    }

    #[test]
    fn route_is_url_safe() {
        let route = movie_details_route(&inception());
        assert!(route.starts_with("movie_details/"));
        let encoded = &route["movie_details/".len()..];
        assert!(!encoded.contains(['/', '?', '&', '"', ' ', '#']));
    }

    #[test]
    fn route_decodes_to_same_movie() {
        let route = movie_details_route(&inception());
        assert_eq!(decode_movie_details(&route), inception());
    }

    #[test]
    fn garbage_falls_back_to_empty_movie() {
        assert_eq!(decode_movie_details("movie_details/%7Bnot-json"), Movie::default());
        assert_eq!(decode_movie_details("movie_details/"), Movie::default());
        assert_eq!(decode_movie_details(MOVIE_LIST_ROUTE), Movie::default());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let route = format!("movie_details/{}", urlencoding::encode(r#"{"id":5}"#));
        let movie = decode_movie_details(&route);
        assert_eq!(movie.id, 5);
        assert_eq!(movie.title, "");
    }
}
