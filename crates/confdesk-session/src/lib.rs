//! Confdesk Session Management
//!
//! - A fixed catalog of tenant configurations, each reachable at a templated base URL
//! - One currently selected tenant
//! - Credentials cached per tenant after the two-step auth handshake
//! - Credentials and selection persisted to local storage, restored on startup

mod auth;
mod error;
mod store;
mod tenant;

pub use auth::{AuthOutcome, AuthState, LoginData, SessionCredentials, SUCCESS_CODE};
pub use error::SessionError;
pub use store::{SessionStore, AUTH_DATA_KEY, CURRENT_CONFIG_KEY};
pub use tenant::{TenantCatalog, TenantConfig, CONFIG_ID_PLACEHOLDER, DEFAULT_URL_TEMPLATE};

pub type Result<T> = std::result::Result<T, SessionError>;
