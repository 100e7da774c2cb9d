//! Merge engine: reconcile two configs under a strategy

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::DeviceIdentity;
use crate::error::Error;
use crate::models::{SyncConfig, SyncMetadata, SyncRecord};

/// How a conflict is resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Keep local data, discard remote
    Local,
    /// Adopt remote data, discard local
    Remote,
    /// Per-record reconciliation by modification time
    #[default]
    Merge,
}

impl MergeStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            "merge" => Ok(Self::Merge),
            other => Err(Error::InvalidInput(format!(
                "unknown merge strategy '{other}' (expected local, remote or merge)"
            ))),
        }
    }
}

/// Union two record collections by id.
///
/// Remote records seed the result in their order; local-only records are
/// appended in local order. When both sides hold an id, the later
/// [`SyncRecord::modified_at`] wins and local wins ties.
pub fn merge_records<T: SyncRecord>(local: &[T], remote: &[T]) -> Vec<T> {
    let mut merged: Vec<T> = Vec::with_capacity(local.len().max(remote.len()));
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in remote {
        if let Some(&position) = index.get(record.id()) {
            merged[position] = record.clone();
        } else {
            index.insert(record.id().to_string(), merged.len());
            merged.push(record.clone());
        }
    }

    for record in local {
        match index.get(record.id()) {
            None => {
                index.insert(record.id().to_string(), merged.len());
                merged.push(record.clone());
            }
            Some(&position) => {
                if record.modified_at() >= merged[position].modified_at() {
                    merged[position] = record.clone();
                }
            }
        }
    }

    merged
}

/// Produce the config that results from resolving `local` against `remote`.
///
/// Pure apart from reading the clock for the new `lastSync`.
#[must_use]
pub fn merge_configs(
    local: &SyncConfig,
    remote: &SyncConfig,
    strategy: MergeStrategy,
    identity: &DeviceIdentity,
) -> SyncConfig {
    let now = Utc::now();

    match strategy {
        MergeStrategy::Local => {
            let mut merged = local.clone();
            merged.metadata.last_sync = now;
            merged
        }
        MergeStrategy::Remote => {
            let mut merged = remote.clone();
            merged.metadata.last_sync = now;
            merged.metadata.device_id.clone_from(&identity.device_id);
            merged
        }
        MergeStrategy::Merge => {
            let websites = merge_records(&local.websites, &remote.websites);
            let categories = merge_records(&local.categories, &remote.categories);
            tracing::debug!(
                websites = websites.len(),
                categories = categories.len(),
                "Merged local and remote records"
            );

            SyncConfig {
                websites,
                categories,
                settings: local.settings.overlay(&remote.settings),
                metadata: SyncMetadata {
                    version: local.metadata.version.clone(),
                    last_sync: now,
                    device_id: identity.device_id.clone(),
                    app_version: identity.app_version.clone(),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::models::{CardSize, SyncSettings, ThemeMode, Website};
    use crate::sync::fixtures::{at, category, config, website};
    use pretty_assertions::assert_eq;

    fn identity() -> DeviceIdentity {
        DeviceIdentity::new("device_here", "9.9.9")
    }

    fn ids(websites: &[Website]) -> BTreeSet<String> {
        websites.iter().map(|website| website.id.clone()).collect()
    }

    #[test]
    fn merged_ids_are_the_union() {
        let local = config(
            vec![website("a", "A", None), website("b", "B", None)],
            Vec::new(),
            at(0),
        );
        let remote = config(
            vec![website("b", "B2", None), website("c", "C", None)],
            Vec::new(),
            at(10),
        );

        let merged = merge_configs(&local, &remote, MergeStrategy::Merge, &identity());
        let expected: BTreeSet<String> = ["a", "b", "c"].iter().map(ToString::to_string).collect();
        assert_eq!(ids(&merged.websites), expected);
    }

    #[test]
    fn newer_record_wins_per_id() {
        let local = config(
            vec![
                website("a", "local-old", Some(at(10))),
                website("b", "local-new", Some(at(50))),
            ],
            Vec::new(),
            at(0),
        );
        let remote = config(
            vec![
                website("a", "remote-new", Some(at(20))),
                website("b", "remote-old", Some(at(40))),
            ],
            Vec::new(),
            at(0),
        );

        let merged = merge_configs(&local, &remote, MergeStrategy::Merge, &identity());
        let names: Vec<&str> = merged.websites.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["remote-new", "local-new"]);
    }

    #[test]
    fn local_wins_ties() {
        let local = config(vec![website("x", "local", Some(at(5)))], Vec::new(), at(0));
        let remote = config(vec![website("x", "remote", Some(at(5)))], Vec::new(), at(0));

        let merged = merge_configs(&local, &remote, MergeStrategy::Merge, &identity());
        assert_eq!(merged.websites, local.websites);
    }

    #[test]
    fn missing_updated_at_falls_back_to_created_at() {
        let mut local_site = website("x", "local", None);
        local_site.created_at = Some(at(100));
        let remote_site = website("x", "remote", Some(at(50)));

        let merged = merge_records(&[local_site.clone()], &[remote_site]);
        assert_eq!(merged, vec![local_site]);
    }

    #[test]
    fn categories_merge_like_websites() {
        let local = config(
            Vec::new(),
            vec![category("c1", "Local", Some(at(1))), category("c2", "Only local", None)],
            at(0),
        );
        let remote = config(Vec::new(), vec![category("c1", "Remote", Some(at(2)))], at(0));

        let merged = merge_configs(&local, &remote, MergeStrategy::Merge, &identity());
        let names: Vec<&str> = merged.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Remote", "Only local"]);
    }

    #[test]
    fn merge_is_idempotent_against_unchanged_remote() {
        let local = config(
            vec![website("a", "A", Some(at(1))), website("b", "B-local", Some(at(9)))],
            vec![category("c", "C", Some(at(3)))],
            at(0),
        );
        let remote = config(
            vec![website("b", "B-remote", Some(at(5))), website("d", "D", Some(at(2)))],
            vec![category("e", "E", None)],
            at(0),
        );

        let once = merge_configs(&local, &remote, MergeStrategy::Merge, &identity());
        let twice = merge_configs(&once, &remote, MergeStrategy::Merge, &identity());
        assert_eq!(once.websites, twice.websites);
        assert_eq!(once.categories, twice.categories);
        assert_eq!(once.settings, twice.settings);
    }

    #[test]
    fn settings_merge_prefers_local_fields() {
        let mut local = config(Vec::new(), Vec::new(), at(0));
        local.settings = SyncSettings {
            theme: Some(ThemeMode::Dark),
            ..SyncSettings::default()
        };
        let mut remote = config(Vec::new(), Vec::new(), at(0));
        remote.settings = SyncSettings {
            theme: Some(ThemeMode::Light),
            card_size: Some(CardSize::Sm),
            show_descriptions: Some(false),
            show_categories: Some(false),
        };

        let merged = merge_configs(&local, &remote, MergeStrategy::Merge, &identity());
        assert_eq!(merged.settings.theme(), ThemeMode::Dark);
        assert_eq!(merged.settings.card_size(), CardSize::Sm);
        assert!(!merged.settings.show_descriptions());
    }

    #[test]
    fn merge_metadata_comes_from_this_device() {
        let mut local = config(Vec::new(), Vec::new(), at(0));
        local.metadata.version = "1.1".to_string();
        let remote = config(Vec::new(), Vec::new(), at(0));

        let merged = merge_configs(&local, &remote, MergeStrategy::Merge, &identity());
        assert_eq!(merged.metadata.version, "1.1");
        assert_eq!(merged.metadata.device_id, "device_here");
        assert_eq!(merged.metadata.app_version, "9.9.9");
        assert!(merged.metadata.last_sync > at(0));
    }

    #[test]
    fn local_strategy_keeps_local_verbatim() {
        let local = config(vec![website("a", "A", Some(at(1)))], Vec::new(), at(0));
        let remote = config(
            vec![website("a", "newer", Some(at(99))), website("z", "Z", None)],
            vec![category("c", "C", None)],
            at(0),
        );

        let merged = merge_configs(&local, &remote, MergeStrategy::Local, &identity());
        assert_eq!(merged.websites, local.websites);
        assert_eq!(merged.categories, local.categories);
        assert_eq!(merged.metadata.device_id, local.metadata.device_id);
        assert!(merged.metadata.last_sync > local.metadata.last_sync);
    }

    #[test]
    fn remote_strategy_takes_remote_with_local_device_id() {
        let local = config(vec![website("a", "A", Some(at(99)))], Vec::new(), at(0));
        let remote = config(vec![website("z", "Z", None)], Vec::new(), at(0));

        let merged = merge_configs(&local, &remote, MergeStrategy::Remote, &identity());
        assert_eq!(merged.websites, remote.websites);
        assert_eq!(merged.metadata.device_id, "device_here");
        assert_eq!(merged.metadata.app_version, remote.metadata.app_version);
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Merge".parse::<MergeStrategy>().unwrap(), MergeStrategy::Merge);
        assert_eq!(" local ".parse::<MergeStrategy>().unwrap(), MergeStrategy::Local);
        assert!("both".parse::<MergeStrategy>().is_err());
    }
}
