//! Count-based change summaries for the sync history

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{SyncConfig, SyncRecord};

/// What changed between two configs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDiff {
    pub websites_added: usize,
    pub websites_modified: usize,
    pub websites_deleted: usize,
    pub categories_added: usize,
    pub categories_modified: usize,
    pub categories_deleted: usize,
    pub settings_changed: bool,
}

impl ConfigDiff {
    /// Summary for pushing `config` with no known remote baseline
    pub fn initial_upload(config: &SyncConfig) -> Self {
        Self {
            websites_added: config.websites.len(),
            categories_added: config.categories.len(),
            settings_changed: true,
            ..Self::default()
        }
    }

    pub const fn has_changes(&self) -> bool {
        self.websites_added > 0
            || self.websites_modified > 0
            || self.websites_deleted > 0
            || self.categories_added > 0
            || self.categories_modified > 0
            || self.categories_deleted > 0
            || self.settings_changed
    }
}

/// Returns (added, modified, deleted)
fn diff_records<T: SyncRecord>(old: &[T], new: &[T]) -> (usize, usize, usize) {
    let mut old_by_id: HashMap<&str, &T> = HashMap::with_capacity(old.len());
    for record in old {
        old_by_id.entry(record.id()).or_insert(record);
    }
    let new_ids: HashSet<&str> = new.iter().map(SyncRecord::id).collect();

    let mut added = 0;
    let mut modified = 0;
    for record in new {
        match old_by_id.get(record.id()) {
            None => added += 1,
            Some(previous) if *previous != record => modified += 1,
            Some(_) => {}
        }
    }
    let deleted = old
        .iter()
        .filter(|record| !new_ids.contains(record.id()))
        .count();

    (added, modified, deleted)
}

/// Compute what applying `new` over `old` changes. Audit only.
pub fn calculate_diff(old: &SyncConfig, new: &SyncConfig) -> ConfigDiff {
    let (websites_added, websites_modified, websites_deleted) =
        diff_records(&old.websites, &new.websites);
    let (categories_added, categories_modified, categories_deleted) =
        diff_records(&old.categories, &new.categories);

    ConfigDiff {
        websites_added,
        websites_modified,
        websites_deleted,
        categories_added,
        categories_modified,
        categories_deleted,
        settings_changed: old.settings != new.settings,
    }
}
