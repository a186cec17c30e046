//! SimpleText Identity
//!
//! Mock authentication for the client: sign-in always succeeds and produces
//! a locally persisted profile. The entitlement tracker keys its records off
//! the identity this crate supplies.

pub mod error;
pub mod provider;
pub mod user;

pub use error::{IdentityError, IdentityResult};
pub use provider::{IdentityProvider, SocialProvider};
pub use user::UserProfile;
