//! User preferences: theme and font scale
//!
//! The effective color scheme is a pure derivation of the stored preference
//! and the host scheme, computed on demand. Nothing caches the result.

use serde::{Deserialize, Serialize};
use simpletext_shared::KeyValueStore;
use tracing::warn;

const SETTINGS_STORAGE_KEY: &str = "app_settings";

/// Stored theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

/// Concrete scheme after resolving `System` against the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ThemePreference {
    /// Resolve the preference against the host scheme.
    pub fn resolve(&self, system: ColorScheme) -> ColorScheme {
        match self {
            Self::Light => ColorScheme::Light,
            Self::Dark => ColorScheme::Dark,
            Self::System => system,
        }
    }
}

impl std::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
            Self::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(format!("Invalid theme: {}", s)),
        }
    }
}

/// Font scale preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontScale {
    Small,
    #[default]
    Medium,
    Large,
}

/// Point sizes for one font scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizes {
    pub small: u16,
    pub normal: u16,
    pub large: u16,
    pub xlarge: u16,
}

impl FontScale {
    /// Static scale table
    pub fn sizes(&self) -> FontSizes {
        match self {
            Self::Small => FontSizes {
                small: 12,
                normal: 14,
                large: 16,
                xlarge: 20,
            },
            Self::Medium => FontSizes {
                small: 14,
                normal: 16,
                large: 18,
                xlarge: 22,
            },
            Self::Large => FontSizes {
                small: 16,
                normal: 18,
                large: 20,
                xlarge: 24,
            },
        }
    }
}

impl std::fmt::Display for FontScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Large => write!(f, "large"),
        }
    }
}

impl std::str::FromStr for FontScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(format!("Invalid font scale: {}", s)),
        }
    }
}

/// Persisted preference blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: ThemePreference,
    pub font_size_level: FontScale,
}

impl AppSettings {
    /// Load stored settings; any failure degrades to defaults.
    pub async fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(SETTINGS_STORAGE_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "stored settings are unreadable, using defaults");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "failed to load settings, using defaults");
                Self::default()
            }
        }
    }

    /// Best-effort save; failures are logged.
    pub async fn save(&self, store: &dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(raw) => {
                if let Err(e) = store.set(SETTINGS_STORAGE_KEY, &raw).await {
                    warn!(error = %e, "failed to persist settings");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize settings"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
