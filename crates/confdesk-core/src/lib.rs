//! Confdesk Core
//!
//! Wires storage, session store, API client and routes into one
//! [`AppContext`] that callers pass around instead of reaching for globals.

mod config;
mod context;
mod error;

pub use config::Config;
pub use context::AppContext;
pub use error::CoreError;

pub use confdesk_api::{ApiClient, ApiError};
pub use confdesk_navigation::{NavigationError, Route, RouteResolution, RouteTable, View};
pub use confdesk_session::{
    AuthOutcome, AuthState, LoginData, SessionCredentials, SessionError, SessionStore,
    TenantCatalog, TenantConfig,
};
pub use confdesk_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
