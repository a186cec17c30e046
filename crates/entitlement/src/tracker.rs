//! Entitlement Tracker
//!
//! Owns the single resident entitlement record for the signed-in identity
//! and the persistence around it. The tracker is an explicitly owned state
//! object: callers hold it and pass the identity into every operation, there
//! is no ambient context.
//!
//! Persistence is best-effort cache, not a durable-storage contract: a read
//! failure degrades to an in-memory default and a write failure leaves the
//! in-memory state correct but not yet durable. Both are logged, neither is
//! surfaced to the caller.

use std::sync::Arc;

use simpletext_shared::{now_ms, KeyValueStore, PlanType, UserId};
use tracing::{debug, info, warn};

use crate::error::{EntitlementError, EntitlementResult};
use crate::payment::PaymentDetailsInput;
use crate::record::EntitlementRecord;

/// Storage key prefix; the full key is `simpletext_subscription_<user id>`.
const SUBSCRIPTION_KEY_PREFIX: &str = "simpletext_subscription";

struct Session {
    user_id: UserId,
    record: EntitlementRecord,
}

/// Tracks plan state, trial window, and token usage for one identity at a
/// time. At most one record is resident; signing out discards it and
/// switching identities reloads.
pub struct EntitlementTracker {
    store: Arc<dyn KeyValueStore>,
    session: Option<Session>,
}

impl EntitlementTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            session: None,
        }
    }

    fn storage_key(user: &UserId) -> String {
        format!("{}_{}", SUBSCRIPTION_KEY_PREFIX, user)
    }

    /// Load the stored record for `user`, or initialize and persist a fresh
    /// free-plan record with a trial window when none exists.
    ///
    /// Storage errors never fail this call: the tracker degrades to an
    /// in-memory free-plan default without a trial and logs the cause.
    pub async fn load_or_init(&mut self, user: &UserId) -> EntitlementRecord {
        let key = Self::storage_key(user);
        let now = now_ms();

        let record = match self.store.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<EntitlementRecord>(&raw) {
                Ok(record) => {
                    debug!(user = %user, plan = %record.plan_type, "loaded stored entitlement record");
                    record
                }
                Err(e) => {
                    warn!(user = %user, error = %e, "stored entitlement record is unreadable, using in-memory default");
                    EntitlementRecord::fallback_default(now)
                }
            },
            Ok(None) => {
                let record = EntitlementRecord::trial_default(now);
                info!(user = %user, "no stored entitlement record, initializing free plan with trial");
                Self::persist(self.store.as_ref(), &key, &record).await;
                record
            }
            Err(e) => {
                warn!(user = %user, error = %e, "failed to load entitlement record, using in-memory default");
                EntitlementRecord::fallback_default(now)
            }
        };

        self.session = Some(Session {
            user_id: *user,
            record: record.clone(),
        });
        record
    }

    /// Record a plan change for an already-authorized payment.
    ///
    /// Valid for any plan; calling with `Free` behaves as a downgrade.
    pub async fn subscribe_to_plan(
        &mut self,
        user: &UserId,
        plan: PlanType,
        payment: Option<PaymentDetailsInput>,
    ) -> EntitlementResult<()> {
        let now = now_ms();
        let session = self.session_mut(user)?;
        session.record.apply_plan(plan, now, payment);
        let record = session.record.clone();

        info!(user = %user, plan = %plan, "subscription plan changed");
        Self::persist(self.store.as_ref(), &Self::storage_key(user), &record).await;
        Ok(())
    }

    /// Revert to the free plan, clearing payment details. Token usage is
    /// carried over as-is.
    pub async fn cancel_subscription(&mut self, user: &UserId) -> EntitlementResult<()> {
        let session = self.session_mut(user)?;
        session.record.cancel();
        let record = session.record.clone();

        info!(user = %user, "subscription cancelled, reverted to free plan");
        Self::persist(self.store.as_ref(), &Self::storage_key(user), &record).await;
        Ok(())
    }

    /// Charge `amount` tokens. The single admission-control decision point:
    /// paid plans always pass, the free plan commits iff the ceiling holds.
    pub async fn use_tokens(&mut self, user: &UserId, amount: u64) -> EntitlementResult<()> {
        let session = self.session_mut(user)?;

        if !session.record.plan_type.meters_tokens() {
            debug!(user = %user, plan = %session.record.plan_type, "token usage not metered on paid plan");
            return Ok(());
        }

        session.record.charge_tokens(amount).map_err(|e| {
            debug!(user = %user, amount, "token charge denied: {e}");
            e
        })?;
        let record = session.record.clone();

        debug!(user = %user, amount, usage = record.token_usage, "token usage committed");
        Self::persist(self.store.as_ref(), &Self::storage_key(user), &record).await;
        Ok(())
    }

    /// Zero the usage counter for a new billing cycle.
    pub async fn reset_token_usage(&mut self, user: &UserId) -> EntitlementResult<()> {
        let session = self.session_mut(user)?;
        session.record.reset_token_usage();
        let record = session.record.clone();

        info!(user = %user, "token usage reset");
        Self::persist(self.store.as_ref(), &Self::storage_key(user), &record).await;
        Ok(())
    }

    /// Discard the resident record. The stored copy is never deleted; it is
    /// simply not loaded again until this identity signs back in.
    pub fn sign_out(&mut self, user: &UserId) {
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.user_id == *user)
        {
            debug!(user = %user, "discarding resident entitlement record");
            self.session = None;
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The resident record for `user`, if one is loaded.
    pub fn record(&self, user: &UserId) -> Option<&EntitlementRecord> {
        self.session
            .as_ref()
            .filter(|s| s.user_id == *user)
            .map(|s| &s.record)
    }

    pub fn is_in_trial(&self, user: &UserId) -> bool {
        self.record(user)
            .is_some_and(|r| r.is_in_trial_at(now_ms()))
    }

    pub fn remaining_trial_days(&self, user: &UserId) -> u32 {
        self.record(user)
            .map_or(0, |r| r.remaining_trial_days_at(now_ms()))
    }

    /// Reads as reached when no record is resident, so callers deny rather
    /// than admit on a missing session.
    pub fn is_token_limit_reached(&self, user: &UserId) -> bool {
        self.record(user).map_or(true, |r| r.is_token_limit_reached())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn session_mut(&mut self, user: &UserId) -> EntitlementResult<&mut Session> {
        self.session
            .as_mut()
            .filter(|s| s.user_id == *user)
            .ok_or(EntitlementError::NoActiveRecord)
    }

    /// Best-effort write-through. Failures leave the in-memory state correct
    /// and durability pending until a later successful write.
    async fn persist(store: &dyn KeyValueStore, key: &str, record: &EntitlementRecord) {
        let raw = match serde_json::to_string(record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize entitlement record");
                return;
            }
        };
        if let Err(e) = store.set(key, &raw).await {
            warn!(key, error = %e, "failed to persist entitlement record");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
