//! Confdesk API Client
//!
//! Tenant-scoped calls against the remote API. Holds no state of its
//! own: every call resolves the tenant's base URL through the session
//! store's live catalog and fails before any I/O when it can't.

mod client;
mod error;

pub use client::{ApiClient, LangValuesEnvelope};
pub use error::ApiError;

pub type Result<T> = std::result::Result<T, ApiError>;
