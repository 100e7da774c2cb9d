use std::env;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use echo_nav_core::gist::GistClient;
use echo_nav_core::store::JsonFileStore;
use echo_nav_core::sync::{ConfigDiff, SyncOutcome};
use echo_nav_core::SyncManager;

use crate::auth::resolve_token;
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

const DATA_DIR_ENV: &str = "ECHO_NAV_DATA_DIR";

pub type CliSyncManager = SyncManager<JsonFileStore, GistClient>;

/// Resolved profile and data location for one invocation
#[derive(Debug, Clone)]
pub struct CliContext {
    pub profile_name: String,
    pub profile: CliProfile,
    pub data_dir: PathBuf,
}

impl CliContext {
    pub fn resolve(
        explicit_profile: Option<&str>,
        cli_data_dir: Option<PathBuf>,
    ) -> Result<Self, CliError> {
        let config = CliProfilesConfig::load()?;
        let profile_name = config.resolve_profile_name(explicit_profile);
        let profile = config.profile(&profile_name).cloned().unwrap_or_default();
        let data_dir = resolve_data_dir(cli_data_dir, &profile)?;
        Ok(Self {
            profile_name,
            profile,
            data_dir,
        })
    }

    pub async fn open_store(&self) -> Result<JsonFileStore, CliError> {
        Ok(JsonFileStore::open(&self.data_dir).await?)
    }

    /// Sync manager backed by the profile's token; fails when none is set.
    pub async fn open_manager(&self) -> Result<CliSyncManager, CliError> {
        let (token, _) = resolve_token(&self.profile_name)?.ok_or(CliError::SyncNotConfigured)?;
        let remote = match self.profile.gist_api_base_url() {
            Some(base_url) => GistClient::with_base_url(base_url, token)?,
            None => GistClient::new(token)?,
        };
        let store = self.open_store().await?;
        Ok(SyncManager::load(store, remote, env!("CARGO_PKG_VERSION")).await?)
    }

    /// Manager for local-only state such as history and auto-sync.
    pub async fn open_offline_manager(&self) -> Result<CliSyncManager, CliError> {
        let store = self.open_store().await?;
        let remote = GistClient::new(String::new())?;
        Ok(SyncManager::load(store, remote, env!("CARGO_PKG_VERSION")).await?)
    }
}

pub fn resolve_data_dir(
    cli_data_dir: Option<PathBuf>,
    profile: &CliProfile,
) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_data_dir
        .or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .or_else(|| profile.data_dir())
    {
        return Ok(path);
    }
    default_data_dir()
}

pub fn default_data_dir() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("echo-nav"))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI data directory".to_string()))
}

pub fn format_sync_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_milliseconds().max(0);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn format_diff(diff: &ConfigDiff) -> String {
    if !diff.has_changes() {
        return "no changes".to_string();
    }

    let mut parts = Vec::new();
    let counts = [
        ("website", "added", diff.websites_added),
        ("website", "modified", diff.websites_modified),
        ("website", "deleted", diff.websites_deleted),
        ("category", "added", diff.categories_added),
        ("category", "modified", diff.categories_modified),
        ("category", "deleted", diff.categories_deleted),
    ];
    for (noun, verb, count) in counts {
        if count > 0 {
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{count} {noun}{plural} {verb}"));
        }
    }
    if diff.settings_changed {
        parts.push("settings changed".to_string());
    }
    parts.join(", ")
}

pub fn format_outcome(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Uploaded(diff) => format!("Uploaded to Gist ({})", format_diff(diff)),
        SyncOutcome::Downloaded(diff) => format!("Downloaded from Gist ({})", format_diff(diff)),
        SyncOutcome::Resolved(diff) => format!("Conflict resolved ({})", format_diff(diff)),
        SyncOutcome::Conflict {
            conflict_type,
            fields,
        } => format!(
            "Conflict detected ({conflict_type}) in {}",
            join_fields(fields)
        ),
    }
}

pub fn join_fields<T: std::fmt::Display>(fields: &[T]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
