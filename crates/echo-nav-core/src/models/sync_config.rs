//! Portable configuration snapshot exchanged with the remote store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, SyncSettings, Website};

/// Schema version written into every config
pub const SYNC_CONFIG_VERSION: &str = "1.0";

/// Provenance of a sync config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetadata {
    pub version: String,
    pub last_sync: DateTime<Utc>,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub app_version: String,
}

/// A full snapshot of websites, categories and settings.
///
/// Built fresh for every sync attempt and never mutated in place; merge
/// stages consume snapshots by reference and return new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub websites: Vec<Website>,
    pub categories: Vec<Category>,
    pub settings: SyncSettings,
    pub metadata: SyncMetadata,
}

impl SyncConfig {
    /// Timestamp used for conflict classification
    pub const fn last_sync(&self) -> DateTime<Utc> {
        self.metadata.last_sync
    }
}
