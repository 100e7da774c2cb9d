//! Data models for Echo Nav

mod category;
mod settings;
mod sync_config;
mod website;

use chrono::{DateTime, Utc};

pub use category::Category;
pub use settings::{CardSize, SyncSettings, ThemeMode};
pub use sync_config::{SyncConfig, SyncMetadata, SYNC_CONFIG_VERSION};
pub use website::Website;

/// A record reconciled by id during sync.
pub trait SyncRecord: Clone + PartialEq {
    /// Stable identity, unique within its collection.
    fn id(&self) -> &str;

    /// Last modification time: `updated_at`, falling back to `created_at`.
    ///
    /// `None` orders before every timestamp.
    fn modified_at(&self) -> Option<DateTime<Utc>>;
}

/// Generate an opaque record id (UUID v7, time-sortable).
#[must_use]
pub fn new_record_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
