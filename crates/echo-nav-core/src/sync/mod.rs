//! Gist synchronization engine.
//!
//! Pipeline: [`build_config`] snapshots local data, [`parse_sync_config`]
//! gates untrusted remote documents, [`detect_conflict`] classifies the
//! divergence, [`merge_configs`] reconciles it and [`calculate_diff`] feeds
//! the audit history. [`SyncManager`] drives the whole sequence.

mod builder;
mod conflict;
mod diff;
mod history;
mod manager;
mod merge;
mod validate;

pub use builder::{build_config, load_or_create_device_id, DeviceIdentity};
pub use conflict::{
    compare_timestamps, detect_conflict, ConflictField, ConflictType, SyncConflict,
    CLOCK_SKEW_TOLERANCE_MS,
};
pub use diff::{calculate_diff, ConfigDiff};
pub use history::{HistoryEntry, SyncHistory, MAX_HISTORY_ENTRIES};
pub use manager::{SyncManager, SyncOutcome};
pub use merge::{merge_configs, merge_records, MergeStrategy};
pub use validate::{check_sync_config, is_valid_sync_config, parse_sync_config};
