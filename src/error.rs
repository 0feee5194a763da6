use thiserror::Error;

#[derive(Error, Debug)]
pub enum MangoError {
    #[error("Missing API token")]
    MissingToken,

    #[error("Missing project id")]
    MissingProjectId,

    #[error("Missing story id")]
    MissingStoryId,

    #[error("Invalid state '{0}'")]
    InvalidState(String),

    #[error("No stories to convert")]
    NoStories,

    #[error("{message} (HTTP {status} {reason})")]
    Api {
        status: u16,
        reason: &'static str,
        message: String,
    },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for MangoError {
    fn from(err: toml::de::Error) -> Self {
        MangoError::Config(err.to_string())
    }
}

/// Result type for mango crate
pub type Result<T> = std::result::Result<T, MangoError>;
