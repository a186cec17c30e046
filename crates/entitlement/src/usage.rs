//! Adapter for provider usage reports
//!
//! Completion APIs report token spend as a nested `usage` object. The
//! tracker itself only accepts a plain integer; call sites deserialize the
//! report and extract the count with [`UsageReport::total_tokens`] before
//! calling in.

use serde::Deserialize;

/// Usage payload as returned by a completion API response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageReport {
    #[serde(default)]
    pub usage: Option<UsageTotals>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageTotals {
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

impl UsageReport {
    /// The token count carried by the report; 0 when absent.
    pub fn total_tokens(&self) -> u64 {
        self.usage
            .as_ref()
            .and_then(|u| u.total_tokens)
            .unwrap_or(0)
    }
}
