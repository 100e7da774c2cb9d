//! Capped audit log of sync attempts

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ConfigDiff;
use crate::state::SyncStatus;

/// Entries kept; the oldest are evicted first
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// One sync attempt and its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub status: SyncStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<ConfigDiff>,
}

impl HistoryEntry {
    pub fn new(status: SyncStatus, message: impl Into<String>, changes: Option<ConfigDiff>) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            timestamp: Utc::now(),
            status,
            message: message.into(),
            changes,
        }
    }
}

/// Append-only history, stored newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HistoryEntry>", into = "Vec<HistoryEntry>")]
pub struct SyncHistory {
    entries: VecDeque<HistoryEntry>,
}

impl From<Vec<HistoryEntry>> for SyncHistory {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        let mut entries = VecDeque::from(entries);
        entries.truncate(MAX_HISTORY_ENTRIES);
        Self { entries }
    }
}

impl From<SyncHistory> for Vec<HistoryEntry> {
    fn from(history: SyncHistory) -> Self {
        history.entries.into()
    }
}

impl SyncHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry, evicting the oldest beyond [`MAX_HISTORY_ENTRIES`]
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Timestamp of the most recent successful entry
    pub fn last_success_time(&self) -> Option<DateTime<Utc>> {
        self.entries
            .iter()
            .find(|entry| entry.status == SyncStatus::Success)
            .map(|entry| entry.timestamp)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> HistoryEntry {
        HistoryEntry::new(SyncStatus::Success, message, None)
    }

    #[test]
    fn fifty_first_entry_evicts_the_oldest() {
        let mut history = SyncHistory::new();
        for index in 0..=MAX_HISTORY_ENTRIES {
            history.push(entry(&format!("entry {index}")));
        }

        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history.latest().unwrap().message, "entry 50");
        assert!(history.iter().all(|entry| entry.message != "entry 0"));
        assert_eq!(history.iter().last().unwrap().message, "entry 1");
    }

    #[test]
    fn eviction_ignores_status() {
        let mut history = SyncHistory::new();
        history.push(HistoryEntry::new(SyncStatus::Error, "oldest error", None));
        for index in 0..MAX_HISTORY_ENTRIES {
            history.push(entry(&format!("ok {index}")));
        }
        assert!(history.iter().all(|entry| entry.status == SyncStatus::Success));
    }

    #[test]
    fn last_success_skips_errors() {
        let mut history = SyncHistory::new();
        let success = entry("uploaded");
        let success_time = success.timestamp;
        history.push(success);
        history.push(HistoryEntry::new(SyncStatus::Error, "failed", None));

        assert_eq!(history.last_success_time(), Some(success_time));
    }

    #[test]
    fn deserializing_truncates_oversized_lists() {
        let entries: Vec<HistoryEntry> = (0..60).map(|i| entry(&i.to_string())).collect();
        let raw = serde_json::to_value(&entries).unwrap();
        let history: SyncHistory = serde_json::from_value(raw).unwrap();
        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history.latest().unwrap().message, "0");
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut history = SyncHistory::new();
        history.push(HistoryEntry::new(
            SyncStatus::Conflict,
            "conflict",
            Some(ConfigDiff::default()),
        ));
        let value = serde_json::to_value(&history).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["status"], "conflict");
        assert_eq!(value[0]["changes"]["websitesAdded"], 0);
    }

    #[test]
    fn clear_empties_history() {
        let mut history = SyncHistory::new();
        history.push(entry("a"));
        history.clear();
        assert!(history.is_empty());
    }
}
