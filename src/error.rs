use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlickError {
    /// Transport or decoding failure talking to the catalog.
    #[error("{0}")]
    Api(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FlickError {
    fn from(err: reqwest::Error) -> Self {
        FlickError::Api(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FlickError>;
