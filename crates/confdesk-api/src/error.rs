//! API client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Config not found or missing url: {0}")]
    ConfigNotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
