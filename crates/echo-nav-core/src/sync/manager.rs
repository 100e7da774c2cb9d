//! Sync orchestrator: upload, download and conflict resolution

use chrono::{DateTime, Utc};

use super::{
    build_config, calculate_diff, detect_conflict, load_or_create_device_id, merge_configs,
    parse_sync_config, ConfigDiff, ConflictField, ConflictType, DeviceIdentity, HistoryEntry,
    MergeStrategy, SyncConflict, SyncHistory,
};
use crate::config::{AutoSyncSettings, AUTO_SYNC_KEY, REMOTE_HANDLE_KEY, SYNC_HISTORY_KEY};
use crate::error::{Error, Result};
use crate::models::SyncConfig;
use crate::state::SyncStatus;
use crate::store::{load_item, save_item, LocalStore, RemoteHandle, RemoteStore};

/// Result of a sync action that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local config pushed to the remote store
    Uploaded(ConfigDiff),
    /// Remote config applied locally without conflict
    Downloaded(ConfigDiff),
    /// Divergence found; nothing changed until [`SyncManager::resolve_conflict`]
    Conflict {
        conflict_type: ConflictType,
        fields: Vec<ConflictField>,
    },
    /// Pending conflict resolved and applied
    Resolved(ConfigDiff),
}

enum DownloadResult {
    Applied(ConfigDiff),
    Pending(SyncConflict),
}

/// Drives the sync pipeline and owns its observable state.
///
/// Operations take `&mut self`, and a manager in `Syncing` rejects new
/// operations, so at most one sync step is in flight per instance.
pub struct SyncManager<L, R> {
    local: L,
    remote: R,
    identity: DeviceIdentity,
    status: SyncStatus,
    message: String,
    last_sync_time: Option<DateTime<Utc>>,
    pending_conflict: Option<SyncConflict>,
    history: SyncHistory,
    auto_sync: AutoSyncSettings,
    remote_handle: Option<RemoteHandle>,
}

impl<L: LocalStore, R: RemoteStore> SyncManager<L, R> {
    /// Restore persisted sync state from `local`.
    ///
    /// Unreadable history, auto-sync or remote handle blobs fall back to
    /// defaults.
    pub async fn load(local: L, remote: R, app_version: impl Into<String>) -> Result<Self> {
        let device_id = load_or_create_device_id(&local).await?;

        let history = load_item::<_, SyncHistory>(&local, SYNC_HISTORY_KEY)
            .await
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "Discarding unreadable sync history");
                None
            })
            .unwrap_or_default();

        let auto_sync = load_item::<_, AutoSyncSettings>(&local, AUTO_SYNC_KEY)
            .await
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "Using default auto-sync settings");
                None
            })
            .unwrap_or_default();

        let remote_handle = load_item::<_, RemoteHandle>(&local, REMOTE_HANDLE_KEY)
            .await
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "Ignoring unreadable remote handle");
                None
            });

        Ok(Self {
            identity: DeviceIdentity::new(device_id, app_version),
            last_sync_time: history.last_success_time(),
            local,
            remote,
            status: SyncStatus::Idle,
            message: String::new(),
            pending_conflict: None,
            history,
            auto_sync,
            remote_handle,
        })
    }

    pub const fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        self.last_sync_time
    }

    pub const fn pending_conflict(&self) -> Option<&SyncConflict> {
        self.pending_conflict.as_ref()
    }

    pub const fn history(&self) -> &SyncHistory {
        &self.history
    }

    pub const fn auto_sync(&self) -> AutoSyncSettings {
        self.auto_sync
    }

    pub const fn remote_handle(&self) -> Option<&RemoteHandle> {
        self.remote_handle.as_ref()
    }

    pub const fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub const fn local(&self) -> &L {
        &self.local
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    /// Snapshot the local store into a fresh config
    pub async fn snapshot(&self) -> Result<SyncConfig> {
        let websites = self.local.load_websites().await?;
        let categories = self.local.load_categories().await?;
        let settings = self.local.load_settings().await?;
        Ok(build_config(websites, categories, &settings, &self.identity))
    }

    /// Push the local config, creating the remote document on first use.
    pub async fn upload(&mut self) -> Result<SyncOutcome> {
        self.ensure_authenticated()?;
        self.begin("Uploading config...")?;

        match self.try_upload().await {
            Ok(diff) => {
                self.last_sync_time = Some(Utc::now());
                self.succeed(SyncStatus::Success, "Config uploaded", Some(diff))
                    .await;
                Ok(SyncOutcome::Uploaded(diff))
            }
            Err(error) => Err(self.fail("Upload failed", error).await),
        }
    }

    /// Fetch the remote config and apply it unless it conflicts with local data.
    pub async fn download(&mut self) -> Result<SyncOutcome> {
        self.ensure_authenticated()?;
        let handle = self
            .remote_handle
            .clone()
            .ok_or(Error::MissingRemoteHandle)?;
        self.begin("Downloading config...")?;

        match self.try_download(&handle).await {
            Ok(DownloadResult::Applied(diff)) => {
                self.last_sync_time = Some(Utc::now());
                self.succeed(SyncStatus::Success, "Config downloaded", Some(diff))
                    .await;
                Ok(SyncOutcome::Downloaded(diff))
            }
            Ok(DownloadResult::Pending(conflict)) => {
                let outcome = SyncOutcome::Conflict {
                    conflict_type: conflict.conflict_type,
                    fields: conflict.conflict_fields.clone(),
                };
                let message = format!(
                    "Conflict detected ({}) in {}",
                    conflict.conflict_type,
                    join_fields(&conflict.conflict_fields)
                );
                self.pending_conflict = Some(conflict);
                self.succeed(SyncStatus::Conflict, message, None).await;
                Ok(outcome)
            }
            Err(error) => Err(self.fail("Download failed", error).await),
        }
    }

    /// Resolve the pending conflict with `strategy` and apply the result.
    ///
    /// Unless the remote side won outright, the result is pushed back to the
    /// remote store. On failure the conflict stays pending.
    pub async fn resolve_conflict(&mut self, strategy: MergeStrategy) -> Result<SyncOutcome> {
        if self.pending_conflict.is_none() {
            return Err(Error::NoPendingConflict);
        }
        self.begin("Resolving conflict...")?;
        let conflict = self
            .pending_conflict
            .take()
            .ok_or(Error::NoPendingConflict)?;

        match self.try_resolve(&conflict, strategy).await {
            Ok(diff) => {
                self.last_sync_time = Some(Utc::now());
                self.succeed(
                    SyncStatus::Success,
                    format!("Conflict resolved (strategy: {strategy})"),
                    Some(diff),
                )
                .await;
                Ok(SyncOutcome::Resolved(diff))
            }
            Err(error) => {
                self.pending_conflict = Some(conflict);
                Err(self.fail("Conflict resolution failed", error).await)
            }
        }
    }

    /// Upload when no remote document exists yet, otherwise download.
    pub async fn sync(&mut self) -> Result<SyncOutcome> {
        self.ensure_authenticated()?;
        if self.remote_handle.is_none() {
            self.upload().await
        } else {
            self.download().await
        }
    }

    /// Locate an existing remote config when none is cached yet.
    pub async fn discover_remote(&mut self) -> Result<Option<RemoteHandle>> {
        self.ensure_authenticated()?;
        if let Some(handle) = &self.remote_handle {
            return Ok(Some(handle.clone()));
        }

        let found = self.remote.find().await?;
        if let Some(handle) = &found {
            tracing::info!(handle = %handle, "Found existing remote config");
            self.remember_remote(handle.clone()).await;
        }
        Ok(found)
    }

    /// Point this installation at an existing remote document
    pub async fn link_remote(&mut self, handle: RemoteHandle) -> Result<()> {
        if self.status == SyncStatus::Syncing {
            return Err(Error::SyncInProgress);
        }
        self.pending_conflict = None;
        save_item(&self.local, REMOTE_HANDLE_KEY, &handle).await?;
        self.remote_handle = Some(handle);
        Ok(())
    }

    /// Update and persist the auto-sync toggle and interval
    pub async fn set_auto_sync(
        &mut self,
        enabled: bool,
        interval_minutes: Option<u32>,
    ) -> AutoSyncSettings {
        self.auto_sync = self.auto_sync.with_update(enabled, interval_minutes);
        if let Err(error) = save_item(&self.local, AUTO_SYNC_KEY, &self.auto_sync).await {
            tracing::warn!(%error, "Failed to persist auto-sync settings");
        }
        self.auto_sync
    }

    pub async fn clear_history(&mut self) {
        self.history.clear();
        if let Err(error) = self.local.remove_item(SYNC_HISTORY_KEY).await {
            tracing::warn!(%error, "Failed to remove persisted sync history");
        }
    }

    async fn try_upload(&mut self) -> Result<ConfigDiff> {
        let config = self.snapshot().await?;
        let handle = self
            .remote
            .save(&config, self.remote_handle.as_ref())
            .await?;
        self.remember_remote(handle).await;
        Ok(ConfigDiff::initial_upload(&config))
    }

    async fn try_download(&mut self, handle: &RemoteHandle) -> Result<DownloadResult> {
        let document = self.remote.fetch(handle).await?;
        let remote_config = parse_sync_config(document)?;
        let local_config = self.snapshot().await?;

        let conflict = detect_conflict(local_config, remote_config);
        if conflict.requires_resolution() {
            return Ok(DownloadResult::Pending(conflict));
        }

        let diff = self
            .apply(&conflict.remote_data, &conflict.local_data)
            .await?;
        Ok(DownloadResult::Applied(diff))
    }

    async fn try_resolve(
        &mut self,
        conflict: &SyncConflict,
        strategy: MergeStrategy,
    ) -> Result<ConfigDiff> {
        let merged = merge_configs(
            &conflict.local_data,
            &conflict.remote_data,
            strategy,
            &self.identity,
        );
        let diff = self.apply(&merged, &conflict.local_data).await?;

        if strategy != MergeStrategy::Remote {
            let handle = self
                .remote
                .save(&merged, self.remote_handle.as_ref())
                .await?;
            self.remember_remote(handle).await;
        }
        Ok(diff)
    }

    /// Replace local collections with `config`, reporting changes against `previous`
    async fn apply(&self, config: &SyncConfig, previous: &SyncConfig) -> Result<ConfigDiff> {
        let diff = calculate_diff(previous, config);
        self.local
            .replace_all(
                config.websites.clone(),
                config.categories.clone(),
                config.settings.clone(),
            )
            .await?;
        tracing::debug!(?diff, "Applied config to local store");
        Ok(diff)
    }

    fn ensure_authenticated(&self) -> Result<()> {
        if self.remote.is_authenticated() {
            Ok(())
        } else {
            Err(Error::NotAuthenticated)
        }
    }

    fn begin(&mut self, message: &str) -> Result<()> {
        if self.status == SyncStatus::Syncing {
            return Err(Error::SyncInProgress);
        }
        self.status = SyncStatus::Syncing;
        self.message = message.to_string();
        Ok(())
    }

    async fn succeed(
        &mut self,
        status: SyncStatus,
        message: impl Into<String>,
        changes: Option<ConfigDiff>,
    ) {
        let message = message.into();
        tracing::info!(status = %status, "{message}");
        self.status = status;
        self.message.clone_from(&message);
        self.record(status, message, changes).await;
    }

    async fn fail(&mut self, context: &str, error: Error) -> Error {
        let message = format!("{context}: {error}");
        tracing::warn!(%error, "{context}");
        self.status = SyncStatus::Error;
        self.message.clone_from(&message);
        self.record(SyncStatus::Error, message, None).await;
        error
    }

    async fn record(&mut self, status: SyncStatus, message: String, changes: Option<ConfigDiff>) {
        self.history
            .push(HistoryEntry::new(status, message, changes));
        if let Err(error) = save_item(&self.local, SYNC_HISTORY_KEY, &self.history).await {
            tracing::warn!(%error, "Failed to persist sync history");
        }
    }

    async fn remember_remote(&mut self, handle: RemoteHandle) {
        if self.remote_handle.as_ref() == Some(&handle) {
            return;
        }
        if let Err(error) = save_item(&self.local, REMOTE_HANDLE_KEY, &handle).await {
            tracing::warn!(%error, "Failed to persist remote handle");
        }
        self.remote_handle = Some(handle);
    }
}

fn join_fields(fields: &[ConflictField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
