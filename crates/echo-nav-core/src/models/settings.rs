//! Display settings carried in a sync config

use serde::{Deserialize, Serialize};

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Follow system preference
    #[default]
    System,
}

/// Website card size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardSize {
    Sm,
    #[default]
    Md,
    Lg,
}

/// Settings subset exchanged with the remote store.
///
/// Every field is optional on the wire; accessors supply the defaults.
/// A field left unset locally falls back to the remote value on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_size: Option<CardSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_descriptions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_categories: Option<bool>,
}

impl SyncSettings {
    /// Settings with every field set to its default
    #[must_use]
    pub const fn defaults() -> Self {
        Self {
            theme: Some(ThemeMode::System),
            card_size: Some(CardSize::Md),
            show_descriptions: Some(true),
            show_categories: Some(true),
        }
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme.unwrap_or_default()
    }

    pub fn card_size(&self) -> CardSize {
        self.card_size.unwrap_or_default()
    }

    pub fn show_descriptions(&self) -> bool {
        self.show_descriptions.unwrap_or(true)
    }

    pub fn show_categories(&self) -> bool {
        self.show_categories.unwrap_or(true)
    }

    /// Fill every unset field with its default
    #[must_use]
    pub fn resolved(&self) -> Self {
        Self {
            theme: Some(self.theme()),
            card_size: Some(self.card_size()),
            show_descriptions: Some(self.show_descriptions()),
            show_categories: Some(self.show_categories()),
        }
    }

    /// Shallow merge: fields set on `self` override `fallback`.
    #[must_use]
    pub fn overlay(&self, fallback: &Self) -> Self {
        Self {
            theme: self.theme.or(fallback.theme),
            card_size: self.card_size.or(fallback.card_size),
            show_descriptions: self.show_descriptions.or(fallback.show_descriptions),
            show_categories: self.show_categories.or(fallback.show_categories),
        }
    }
}
