use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::usecase::DEFAULT_SUGGESTION_LIMIT;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub web_base_url: String,
    pub language: String,
    pub token_env: Option<String>,
    pub token_command: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/original".to_string(),
            web_base_url: "https://www.themoviedb.org".to_string(),
            language: "en-US".to_string(),
            token_env: Some("TMDB_TOKEN".to_string()),
            token_command: None,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Quiet periods and limits for search-as-you-type.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub search_debounce_ms: u64,
    pub suggestion_debounce_ms: u64,
    pub suggestion_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 500,
            suggestion_debounce_ms: 300,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl SearchConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn suggestion_debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

pub fn config_dir() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("flick"))
}

fn config_path() -> Option<PathBuf> {
    Some(config_dir()?.join("config.toml"))
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_config() {
        let toml_str = r#"
[api]
base_url = "http://localhost:8080/3"
language = "de-DE"
token_env = "MY_TMDB_TOKEN"
token_command = "pass show tmdb"
timeout_secs = 5

[search]
search_debounce_ms = 250
suggestion_limit = 8
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080/3");
        assert_eq!(config.api.language, "de-DE");
        assert_eq!(config.api.token_env.as_deref(), Some("MY_TMDB_TOKEN"));
        assert_eq!(config.api.token_command.as_deref(), Some("pass show tmdb"));
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        // unspecified keys keep their defaults
        assert_eq!(
            config.api.image_base_url,
            "https://image.tmdb.org/t/p/original"
        );
        assert_eq!(config.search.search_debounce(), Duration::from_millis(250));
        assert_eq!(config.search.suggestion_debounce(), Duration::from_millis(300));
        assert_eq!(config.search.suggestion_limit, 8);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.api.language, "en-US");
        assert_eq!(config.api.token_env.as_deref(), Some("TMDB_TOKEN"));
        assert_eq!(config.search.search_debounce_ms, 500);
        assert_eq!(config.search.suggestion_debounce_ms, 300);
        assert_eq!(config.search.suggestion_limit, 5);
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let config = Config::load(); // default unless a user config exists
        assert!(!config.api.base_url.is_empty());
    }
}
