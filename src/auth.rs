use crate::config::{self, ApiConfig};
use crate::error::{FlickError, Result};

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        non_empty(String::from_utf8_lossy(&output.stdout).as_ref())
    } else {
        None
    }
}

/// Stored token path: ~/.config/flick/token
fn token_path() -> Option<std::path::PathBuf> {
    Some(config::config_dir()?.join("token"))
}

fn load_stored_token() -> Option<String> {
    let path = token_path()?;
    let token = std::fs::read_to_string(path).ok()?;
    non_empty(&token)
}

fn non_empty(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Load the TMDB bearer token, trying in order:
/// 1. Env var from config (TMDB_TOKEN by default)
/// 2. Stored token in ~/.config/flick/token
/// 3. CLI command from config
pub fn load_token(api: &ApiConfig) -> Result<String> {
    if let Some(env_var) = &api.token_env {
        if let Some(token) = std::env::var(env_var).ok().as_deref().and_then(non_empty) {
            return Ok(token);
        }
    }

    if let Some(token) = load_stored_token() {
        return Ok(token);
    }

    if let Some(cmd) = &api.token_command {
        if let Some(token) = try_cli_token(cmd) {
            return Ok(token);
        }
        tracing::warn!(command = %cmd, "token command produced no token");
    }

    Err(FlickError::Auth(format!(
        "No TMDB token found. Set {} or configure a token_command.",
        api.token_env.as_deref().unwrap_or("a token env var")
    )))
}
