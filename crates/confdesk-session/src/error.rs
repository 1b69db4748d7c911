//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Unknown tenant config: {0}")]
    UnknownTenant(String),

    #[error("Storage error: {0}")]
    Storage(#[from] confdesk_storage::StorageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed {step} response: {reason}")]
    MalformedResponse { step: &'static str, reason: String },

    #[error("Invalid auth transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
