//! Identity error types

use thiserror::Error;

/// Identity-specific errors
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not signed in")]
    NotSignedIn,
}

pub type IdentityResult<T> = Result<T, IdentityError>;
