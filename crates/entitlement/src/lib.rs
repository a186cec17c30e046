//! SimpleText Entitlement Core
//!
//! Owns subscription plan state, trial windows, and token-usage accounting
//! for a single signed-in identity, persisted as JSON through the shared
//! key-value store.

pub mod error;
pub mod payment;
pub mod record;
pub mod tracker;
pub mod usage;

pub use error::{EntitlementError, EntitlementResult};
pub use payment::{PaymentDetails, PaymentDetailsInput};
pub use record::EntitlementRecord;
pub use tracker::EntitlementTracker;
pub use usage::UsageReport;
