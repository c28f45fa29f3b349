use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    /// The remote answered with a non-2xx, non-304 status.
    #[error("fetch failed with HTTP status {status}")]
    Fetch { status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("mapping error: {0}")]
    Mapping(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("feed source not found: {0}")]
    SourceNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MirrorError>;
