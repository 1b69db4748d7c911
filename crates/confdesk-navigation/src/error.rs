//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Duplicate route path: {0}")]
    DuplicatePath(String),

    #[error("Redirect loop at: {0}")]
    RedirectLoop(String),
}
