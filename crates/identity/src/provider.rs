//! Mock identity provider
//!
//! Sign-in is simulated: any credentials are accepted and produce a fresh
//! profile. The profile is persisted through the shared key-value store so a
//! restart restores the signed-in session. Passwords are accepted and
//! ignored; nothing here checks a credential against anything.

use std::sync::Arc;

use simpletext_shared::{KeyValueStore, UserId};
use tracing::{debug, info, warn};

use crate::error::{IdentityError, IdentityResult};
use crate::user::UserProfile;

const USER_STORAGE_KEY: &str = "simpletext_user";

/// External identity provider used for social sign-in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Apple,
}

impl std::fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => write!(f, "Google"),
            Self::Apple => write!(f, "Apple"),
        }
    }
}

impl std::str::FromStr for SocialProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "apple" => Ok(Self::Apple),
            _ => Err(format!("Invalid social provider: {}", s)),
        }
    }
}

/// Holds the current signed-in user, if any, and the persistence around it.
pub struct IdentityProvider {
    store: Arc<dyn KeyValueStore>,
    user: Option<UserProfile>,
}

impl IdentityProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, user: None }
    }

    /// Restore a persisted session at startup. Errors degrade to signed-out.
    pub async fn load(&mut self) -> Option<UserProfile> {
        match self.store.get(USER_STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(profile) => {
                    debug!(user = %profile.id, "restored signed-in session");
                    self.user = Some(profile.clone());
                    Some(profile)
                }
                Err(e) => {
                    warn!(error = %e, "stored user profile is unreadable, starting signed out");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to load user profile, starting signed out");
                None
            }
        }
    }

    /// Mock sign-in: always succeeds for a plausible email, deriving the
    /// display name from the local part.
    pub async fn sign_in(&mut self, email: &str, _password: &str) -> IdentityResult<UserProfile> {
        validate_email(email)?;
        let name = email.split('@').next().unwrap_or_default().to_string();
        let profile = UserProfile::new(email, name);
        self.commit(profile.clone()).await;
        info!(user = %profile.id, "signed in");
        Ok(profile)
    }

    /// Mock sign-up; identical to sign-in except the caller names themselves.
    pub async fn sign_up(
        &mut self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> IdentityResult<UserProfile> {
        validate_email(email)?;
        if name.trim().is_empty() {
            return Err(IdentityError::Validation("name must not be empty".into()));
        }
        let profile = UserProfile::new(email, name.trim());
        self.commit(profile.clone()).await;
        info!(user = %profile.id, "signed up");
        Ok(profile)
    }

    /// Mock social sign-in: synthesizes a profile for the provider.
    pub async fn social_sign_in(&mut self, provider: SocialProvider) -> UserProfile {
        let id = UserId::new();
        let profile = UserProfile {
            id,
            email: format!("user-{}@example.com", id),
            name: format!("{} User", provider),
            is_authenticated: true,
        };
        self.commit(profile.clone()).await;
        info!(user = %profile.id, %provider, "signed in via social provider");
        profile
    }

    /// Clear the session and remove the stored profile.
    pub async fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user = %user.id, "signed out");
        }
        if let Err(e) = self.store.remove(USER_STORAGE_KEY).await {
            warn!(error = %e, "failed to remove stored user profile");
        }
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// The signed-in identity, or `NotSignedIn` for callers that require one.
    pub fn require_user(&self) -> IdentityResult<&UserProfile> {
        self.user.as_ref().ok_or(IdentityError::NotSignedIn)
    }

    async fn commit(&mut self, profile: UserProfile) {
        match serde_json::to_string(&profile) {
            Ok(raw) => {
                if let Err(e) = self.store.set(USER_STORAGE_KEY, &raw).await {
                    warn!(error = %e, "failed to persist user profile");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize user profile"),
        }
        self.user = Some(profile);
    }
}

fn validate_email(email: &str) -> IdentityResult<()> {
    if email.trim().is_empty() {
        return Err(IdentityError::Validation("email must not be empty".into()));
    }
    if !email.contains('@') {
        return Err(IdentityError::Validation(format!(
            "not a valid email address: {}",
            email
        )));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
