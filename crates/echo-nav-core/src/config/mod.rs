//! Persisted sync configuration and storage keys.

use serde::{Deserialize, Serialize};

/// Local store key for the sync history list
pub const SYNC_HISTORY_KEY: &str = "echo-nav-sync-history";
/// Local store key for this installation's device id
pub const DEVICE_ID_KEY: &str = "echo-nav-device-id";
/// Local store key for [`AutoSyncSettings`]
pub const AUTO_SYNC_KEY: &str = "echo-nav-auto-sync";
/// Local store key for the cached remote document handle
pub const REMOTE_HANDLE_KEY: &str = "echo-nav-gist-id";

const DEFAULT_SYNC_INTERVAL_MINUTES: u32 = 30;

/// Auto-sync toggle and interval.
///
/// Only data: an external scheduler is expected to call `sync()` every
/// `interval_minutes` while `enabled` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSyncSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_interval", rename = "interval")]
    pub interval_minutes: u32,
}

impl Default for AutoSyncSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: DEFAULT_SYNC_INTERVAL_MINUTES,
        }
    }
}

impl AutoSyncSettings {
    /// Apply a toggle, keeping the current interval when none (or zero) is given
    #[must_use]
    pub fn with_update(self, enabled: bool, interval_minutes: Option<u32>) -> Self {
        Self {
            enabled,
            interval_minutes: interval_minutes
                .filter(|minutes| *minutes > 0)
                .unwrap_or(self.interval_minutes),
        }
    }
}

const fn default_enabled() -> bool {
    true
}

const fn default_interval() -> u32 {
    DEFAULT_SYNC_INTERVAL_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_sync_defaults_to_enabled_every_thirty_minutes() {
        let settings = AutoSyncSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.interval_minutes, 30);
    }

    #[test]
    fn auto_sync_parses_partial_payload() {
        let settings: AutoSyncSettings = serde_json::from_str(r#"{"enabled":false}"#).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.interval_minutes, 30);

        let settings: AutoSyncSettings = serde_json::from_str(r#"{"interval":5}"#).unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.interval_minutes, 5);
    }

    #[test]
    fn with_update_keeps_interval_when_missing() {
        let settings = AutoSyncSettings::default().with_update(false, None);
        assert_eq!(settings.interval_minutes, 30);
        assert!(!settings.enabled);

        let settings = settings.with_update(true, Some(0));
        assert_eq!(settings.interval_minutes, 30);

        let settings = settings.with_update(true, Some(10));
        assert_eq!(settings.interval_minutes, 10);
    }
}
