//! Conflict detection between a local and a remote config

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::SyncConfig;

/// `lastSync` values closer than this are treated as the same sync
pub const CLOCK_SKEW_TOLERANCE_MS: i64 = 5_000;

/// Relationship between a local and a remote config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    LocalNewer,
    RemoteNewer,
    /// Part of the shared document vocabulary; never produced by [`detect_conflict`]
    BothModified,
    NoConflict,
}

impl ConflictType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocalNewer => "local_newer",
            Self::RemoteNewer => "remote_newer",
            Self::BothModified => "both_modified",
            Self::NoConflict => "no_conflict",
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level config section whose content differs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictField {
    Websites,
    Categories,
    Settings,
}

impl ConflictField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Websites => "websites",
            Self::Categories => "categories",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for ConflictField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected divergence, consumed once by conflict resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConflict {
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub local_data: SyncConfig,
    pub remote_data: SyncConfig,
    pub conflict_fields: Vec<ConflictField>,
}

impl SyncConflict {
    /// Whether this needs an explicit resolution before data is touched
    pub fn requires_resolution(&self) -> bool {
        self.conflict_type != ConflictType::NoConflict && !self.conflict_fields.is_empty()
    }
}

/// Classify two configs by their `lastSync` timestamps alone.
pub fn compare_timestamps(local: &SyncConfig, remote: &SyncConfig) -> ConflictType {
    let local_time = local.last_sync();
    let remote_time = remote.last_sync();
    let diff_ms = (local_time - remote_time).num_milliseconds().abs();

    if diff_ms <= CLOCK_SKEW_TOLERANCE_MS {
        ConflictType::NoConflict
    } else if local_time > remote_time {
        ConflictType::LocalNewer
    } else {
        ConflictType::RemoteNewer
    }
}

/// Compare two configs section by section.
///
/// The reported type is `NoConflict` whenever no section differs, whatever
/// the timestamps say.
pub fn detect_conflict(local: SyncConfig, remote: SyncConfig) -> SyncConflict {
    let timestamp_type = compare_timestamps(&local, &remote);

    let mut conflict_fields = Vec::new();
    if local.websites != remote.websites {
        conflict_fields.push(ConflictField::Websites);
    }
    if local.categories != remote.categories {
        conflict_fields.push(ConflictField::Categories);
    }
    if local.settings != remote.settings {
        conflict_fields.push(ConflictField::Settings);
    }

    let conflict_type = if conflict_fields.is_empty() {
        ConflictType::NoConflict
    } else {
        timestamp_type
    };

    tracing::debug!(
        conflict_type = %conflict_type,
        fields = ?conflict_fields,
        "Compared local and remote configs"
    );

    SyncConflict {
        conflict_type,
        local_data: local,
        remote_data: remote,
        conflict_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThemeMode;
    use crate::sync::fixtures::{at, at_millis, config, website};
    use pretty_assertions::assert_eq;

    #[test]
    fn exactly_five_seconds_apart_is_no_conflict() {
        let local = config(vec![website("a", "Local", Some(at(1)))], Vec::new(), at(100));
        let remote = config(
            vec![website("a", "Remote", Some(at(2)))],
            Vec::new(),
            at_millis(at(100), 5_000),
        );
        assert_eq!(compare_timestamps(&local, &remote), ConflictType::NoConflict);

        let conflict = detect_conflict(local, remote);
        assert_eq!(conflict.conflict_type, ConflictType::NoConflict);
        assert_eq!(conflict.conflict_fields, vec![ConflictField::Websites]);
        assert!(!conflict.requires_resolution());
    }

    #[test]
    fn just_over_five_seconds_picks_newer_side() {
        let remote = config(vec![website("a", "Remote", None)], Vec::new(), at(100));
        let local = config(
            vec![website("a", "Local", None)],
            Vec::new(),
            at_millis(at(100), 5_001),
        );

        let conflict = detect_conflict(local.clone(), remote.clone());
        assert_eq!(conflict.conflict_type, ConflictType::LocalNewer);
        assert!(conflict.requires_resolution());

        let conflict = detect_conflict(remote, local);
        assert_eq!(conflict.conflict_type, ConflictType::RemoteNewer);
    }

    #[test]
    fn identical_content_is_no_conflict_regardless_of_time() {
        let websites = vec![website("a", "Same", Some(at(1)))];
        let local = config(websites.clone(), Vec::new(), at(0));
        let remote = config(websites, Vec::new(), at(3_600));

        let conflict = detect_conflict(local, remote);
        assert_eq!(conflict.conflict_type, ConflictType::NoConflict);
        assert!(conflict.conflict_fields.is_empty());
    }

    #[test]
    fn reports_every_differing_section() {
        let local = config(vec![website("a", "A", None)], Vec::new(), at(0));
        let mut remote = config(
            Vec::new(),
            vec![crate::sync::fixtures::category("c", "Dev", None)],
            at(3_600),
        );
        remote.settings.theme = Some(ThemeMode::Dark);

        let conflict = detect_conflict(local, remote);
        assert_eq!(
            conflict.conflict_fields,
            vec![
                ConflictField::Websites,
                ConflictField::Categories,
                ConflictField::Settings
            ]
        );
        assert_eq!(conflict.conflict_type, ConflictType::RemoteNewer);
    }

    #[test]
    fn metadata_differences_alone_are_not_conflicts() {
        let local = config(Vec::new(), Vec::new(), at(0));
        let mut remote = config(Vec::new(), Vec::new(), at(3_600));
        remote.metadata.device_id = "device_other".to_string();

        assert!(detect_conflict(local, remote).conflict_fields.is_empty());
    }

    #[test]
    fn conflict_serializes_with_wire_names() {
        let conflict = detect_conflict(
            config(vec![website("a", "A", None)], Vec::new(), at(0)),
            config(Vec::new(), Vec::new(), at(60)),
        );
        let value = serde_json::to_value(&conflict).unwrap();
        assert_eq!(value["type"], "remote_newer");
        assert_eq!(value["conflictFields"], serde_json::json!(["websites"]));
    }
}
