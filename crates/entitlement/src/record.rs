//! The Entitlement Record and its state transitions
//!
//! One record exists per signed-in identity. Every transition here is a pure
//! function of the record and an explicit `now_ms`, so the same inputs always
//! produce the same outputs; the tracker supplies the wall clock and the
//! persistence around these calls.

use serde::{Deserialize, Serialize};
use simpletext_shared::{PlanType, DAY_MS, TRIAL_PERIOD_DAYS};

use crate::error::EntitlementError;
use crate::payment::{PaymentDetails, PaymentDetailsInput};

/// Persisted subscription state for one identity.
///
/// Timestamps are integer milliseconds since the Unix epoch; an
/// `expiry_date` of 0 means the plan never expires (free plan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementRecord {
    pub plan_type: PlanType,
    pub start_date: i64,
    pub expiry_date: i64,
    pub token_usage: u64,
    pub token_limit: u64,
    pub is_active: bool,
    pub trial_ends_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<PaymentDetails>,
}

impl EntitlementRecord {
    /// Default record for a newly observed identity: free plan with a
    /// 14-day trial window.
    pub fn trial_default(now_ms: i64) -> Self {
        Self {
            plan_type: PlanType::Free,
            start_date: now_ms,
            expiry_date: 0,
            token_usage: 0,
            token_limit: PlanType::Free.token_limit(),
            is_active: true,
            trial_ends_at: Some(now_ms + TRIAL_PERIOD_DAYS * DAY_MS),
            payment_details: None,
        }
    }

    /// In-memory degrade target when storage cannot be read: free plan,
    /// no trial. Never persisted.
    pub fn fallback_default(now_ms: i64) -> Self {
        Self {
            trial_ends_at: None,
            ..Self::trial_default(now_ms)
        }
    }

    /// Move the record onto `plan`.
    ///
    /// Resets usage to 0, recomputes the token ceiling from the plan table,
    /// and stamps the billing window. The trial window is left as-is.
    /// Paid plans always carry payment details: missing fields (or a missing
    /// input altogether) are placeholder-filled, never rejected. A downgrade
    /// to free clears them.
    pub fn apply_plan(&mut self, plan: PlanType, now_ms: i64, payment: Option<PaymentDetailsInput>) {
        self.plan_type = plan;
        self.start_date = now_ms;
        self.expiry_date = plan.billing_period_ms().map_or(0, |period| now_ms + period);
        self.token_usage = 0;
        self.token_limit = plan.token_limit();
        self.is_active = true;
        self.payment_details = if plan.is_paid() {
            Some(PaymentDetails::from_input(payment.unwrap_or_default()))
        } else {
            None
        };
    }

    /// Revert to the free plan.
    ///
    /// Token usage is deliberately left untouched: a cancelling paid user
    /// inherits whatever usage value was last stored. Callers that want a
    /// clean slate reset explicitly.
    pub fn cancel(&mut self) {
        self.plan_type = PlanType::Free;
        self.expiry_date = 0;
        self.token_limit = PlanType::Free.token_limit();
        self.is_active = true;
        self.payment_details = None;
    }

    /// Charge `amount` tokens against the record.
    ///
    /// Paid plans are never metered: the call succeeds without mutation.
    /// On the free plan the charge commits iff it stays within the ceiling;
    /// otherwise the record is unchanged and `TokenLimitReached` is returned.
    pub fn charge_tokens(&mut self, amount: u64) -> Result<(), EntitlementError> {
        if !self.plan_type.meters_tokens() {
            return Ok(());
        }

        let new_usage = self.token_usage.saturating_add(amount);
        if new_usage > self.token_limit {
            return Err(EntitlementError::TokenLimitReached {
                requested: amount,
                used: self.token_usage,
                limit: self.token_limit,
            });
        }

        self.token_usage = new_usage;
        Ok(())
    }

    /// Zero the usage counter. Meant for billing-cycle rollover; invoked
    /// externally by whoever tracks billing periods.
    pub fn reset_token_usage(&mut self) {
        self.token_usage = 0;
    }

    // =========================================================================
    // Derived queries
    // =========================================================================

    /// A trial is active iff `trial_ends_at` is set and in the future.
    /// Expiry never mutates the record; it is derived on read.
    pub fn is_in_trial_at(&self, now_ms: i64) -> bool {
        self.remaining_trial_days_at(now_ms) > 0
    }

    /// Whole days of trial left, rounded up, floored at 0.
    pub fn remaining_trial_days_at(&self, now_ms: i64) -> u32 {
        let Some(ends_at) = self.trial_ends_at else {
            return 0;
        };
        let diff = ends_at - now_ms;
        if diff <= 0 {
            return 0;
        }
        ((diff + DAY_MS - 1) / DAY_MS) as u32
    }

    pub fn is_token_limit_reached(&self) -> bool {
        self.token_usage >= self.token_limit
    }
}

// =============================================================================
// Tests
// =============================================================================
