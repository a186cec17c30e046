//! Error types for SimpleText storage

use thiserror::Error;

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
