//! Error types for Scriptwright.

use thiserror::Error;

/// Library-level error type for Scriptwright operations.
#[derive(Error, Debug)]
pub enum ScriptwrightError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} is not configured")]
    MissingCredential(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("An error occurred with the AI agent: {0}")]
    Agent(String),

    #[error("Transcript unavailable: {0}")]
    Transcript(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Scriptwright operations.
pub type Result<T> = std::result::Result<T, ScriptwrightError>;
