//! Confdesk Storage Layer
//!
//! SQLite-backed string key-value store. Stands in for the browser's
//! local storage: every value is an opaque string under a string key.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
