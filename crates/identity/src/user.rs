//! User profile model

use serde::{Deserialize, Serialize};
use simpletext_shared::UserId;

/// Signed-in user profile, persisted as JSON under `simpletext_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub is_authenticated: bool,
}

impl UserProfile {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            name: name.into(),
            is_authenticated: true,
        }
    }
}
