//! Common types used across SimpleText

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One day in milliseconds
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Length of the free-plan trial window in days
pub const TRIAL_PERIOD_DAYS: i64 = 14;

// =============================================================================
// ID Wrappers
// =============================================================================

/// User ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Plans
// =============================================================================

/// Subscription plan for billing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Free,
    Monthly,
    Yearly,
}

impl Default for PlanType {
    fn default() -> Self {
        Self::Free
    }
}

impl PlanType {
    /// Token ceiling for this plan
    /// Plan ladder: Free (15K) → Monthly (1M) → Yearly (15M)
    pub fn token_limit(&self) -> u64 {
        match self {
            Self::Free => 15_000,
            Self::Monthly => 1_000_000,
            Self::Yearly => 15_000_000,
        }
    }

    /// Monthly price in cents (0 where not applicable)
    pub fn price_monthly_cents(&self) -> i64 {
        match self {
            Self::Free => 0,
            Self::Monthly => 199,
            Self::Yearly => 0, // Billed annually
        }
    }

    /// Yearly price in cents (0 where not applicable)
    pub fn price_yearly_cents(&self) -> i64 {
        match self {
            Self::Free => 0,
            Self::Monthly => 0, // Billed monthly
            Self::Yearly => 1_299,
        }
    }

    /// Price charged per billing period in cents
    pub fn price_cents(&self) -> i64 {
        match self {
            Self::Free => 0,
            Self::Monthly => self.price_monthly_cents(),
            Self::Yearly => self.price_yearly_cents(),
        }
    }

    /// Billing period length in milliseconds; `None` for plans that never expire
    pub fn billing_period_ms(&self) -> Option<i64> {
        match self {
            Self::Free => None,
            Self::Monthly => Some(30 * DAY_MS),
            Self::Yearly => Some(365 * DAY_MS),
        }
    }

    /// Human-readable plan name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// Whether this plan is paid
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Monthly | Self::Yearly)
    }

    /// Whether token usage is metered on this plan
    /// Paid plans are accounted as unlimited regardless of their ceiling
    pub fn meters_tokens(&self) -> bool {
        !self.is_paid()
    }

    /// Static lookup of the full plan table row
    pub fn details(&self) -> PlanDetails {
        PlanDetails {
            name: self.display_name(),
            token_limit: self.token_limit(),
            price_monthly_cents: self.price_monthly_cents(),
            price_yearly_cents: self.price_yearly_cents(),
        }
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl std::str::FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Invalid plan type: {}", s)),
        }
    }
}

/// One row of the static plan table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDetails {
    pub name: &'static str,
    pub token_limit: u64,
    pub price_monthly_cents: i64,
    pub price_yearly_cents: i64,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_type_default() {
        assert_eq!(PlanType::default(), PlanType::Free);
    }

    #[test]
    fn test_plan_token_limits() {
        assert_eq!(PlanType::Free.token_limit(), 15_000);
        assert_eq!(PlanType::Monthly.token_limit(), 1_000_000);
        assert_eq!(PlanType::Yearly.token_limit(), 15_000_000);
    }

    #[test]
    fn test_plan_prices() {
        assert_eq!(PlanType::Free.price_cents(), 0);
        assert_eq!(PlanType::Monthly.price_cents(), 199);
        assert_eq!(PlanType::Yearly.price_cents(), 1_299);

        // Cross-interval prices are 0 rather than derived
        assert_eq!(PlanType::Monthly.price_yearly_cents(), 0);
        assert_eq!(PlanType::Yearly.price_monthly_cents(), 0);
    }

    #[test]
    fn test_plan_billing_periods() {
        assert_eq!(PlanType::Free.billing_period_ms(), None);
        assert_eq!(PlanType::Monthly.billing_period_ms(), Some(30 * DAY_MS));
        assert_eq!(PlanType::Yearly.billing_period_ms(), Some(365 * DAY_MS));
    }

    #[test]
    fn test_plan_metering() {
        assert!(PlanType::Free.meters_tokens());
        assert!(!PlanType::Monthly.meters_tokens());
        assert!(!PlanType::Yearly.meters_tokens());

        assert!(!PlanType::Free.is_paid());
        assert!(PlanType::Monthly.is_paid());
        assert!(PlanType::Yearly.is_paid());
    }

    #[test]
    fn test_plan_details_lookup() {
        let details = PlanType::Monthly.details();
        assert_eq!(details.name, "Monthly");
        assert_eq!(details.token_limit, 1_000_000);
        assert_eq!(details.price_monthly_cents, 199);
    }

    #[test]
    fn test_plan_type_display() {
        assert_eq!(format!("{}", PlanType::Free), "free");
        assert_eq!(format!("{}", PlanType::Monthly), "monthly");
        assert_eq!(format!("{}", PlanType::Yearly), "yearly");
    }

    #[test]
    fn test_plan_type_from_str() {
        assert_eq!("free".parse::<PlanType>().unwrap(), PlanType::Free);
        assert_eq!("MONTHLY".parse::<PlanType>().unwrap(), PlanType::Monthly);
        assert_eq!("Yearly".parse::<PlanType>().unwrap(), PlanType::Yearly);
        assert!("weekly".parse::<PlanType>().is_err());
    }

    #[test]
    fn test_plan_type_serde_lowercase() {
        let json = serde_json::to_string(&PlanType::Yearly).unwrap();
        assert_eq!(json, "\"yearly\"");
        let back: PlanType = serde_json::from_str("\"free\"").unwrap();
        assert_eq!(back, PlanType::Free);
    }

    #[test]
    fn test_user_id_new() {
        let id1 = UserId::new();
        let id2 = UserId::new();
        assert_ne!(id1, id2); // Each new ID should be unique
    }

    #[test]
    fn test_user_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let user_id: UserId = uuid.into();
        assert_eq!(user_id.0, uuid);
    }
}
