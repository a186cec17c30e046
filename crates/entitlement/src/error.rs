//! Entitlement error types

use thiserror::Error;

/// Entitlement-specific errors
#[derive(Debug, Error)]
pub enum EntitlementError {
    /// An operation was called with no entitlement record resident in memory
    /// for the given identity.
    #[error("No active entitlement record for this identity")]
    NoActiveRecord,

    /// A free-plan token charge would exceed the plan ceiling. The record is
    /// left unchanged; deny the triggering action, this is not a hard error.
    #[error("Token limit reached: {used} used + {requested} requested > {limit}")]
    TokenLimitReached {
        requested: u64,
        used: u64,
        limit: u64,
    },
}

pub type EntitlementResult<T> = Result<T, EntitlementError>;
