//! Confdesk Navigation
//!
//! Route table for the client:
//! - `/login` → login view
//! - `/register` → registration view
//! - `/dashboard` → dashboard view, flagged as requiring auth
//! - `/` → redirect to `/login`
//!
//! The auth flag is metadata only. Enforcing it is up to the caller.

mod error;
mod route;
mod table;

pub use error::NavigationError;
pub use route::{Route, RouteTarget, View};
pub use table::{RouteResolution, RouteTable};

pub type Result<T> = std::result::Result<T, NavigationError>;
