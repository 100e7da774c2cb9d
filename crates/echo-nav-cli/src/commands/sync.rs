use echo_nav_core::store::{LocalStore, RemoteHandle, RemoteStore};
use echo_nav_core::sync::SyncOutcome;
use echo_nav_core::{MergeStrategy, SyncManager};

use super::common::{format_outcome, join_fields, CliContext};
use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Upload when no remote exists, otherwise download
    Auto,
    Push,
    Pull,
}

pub async fn run_sync(
    context: &CliContext,
    mode: SyncMode,
    resolve: Option<MergeStrategy>,
) -> Result<(), CliError> {
    let mut manager = context.open_manager().await?;
    let outcomes = sync_with(&mut manager, mode, resolve).await?;
    for outcome in &outcomes {
        println!("{}", format_outcome(outcome));
    }
    Ok(())
}

/// Run one sync step and, when asked, resolve the conflict it reports.
pub async fn sync_with<L: LocalStore, R: RemoteStore>(
    manager: &mut SyncManager<L, R>,
    mode: SyncMode,
    resolve: Option<MergeStrategy>,
) -> Result<Vec<SyncOutcome>, CliError> {
    // Reuse an existing config Gist instead of creating a second one.
    manager.discover_remote().await?;

    let outcome = match mode {
        SyncMode::Auto => manager.sync().await?,
        SyncMode::Push => manager.upload().await?,
        SyncMode::Pull => manager.download().await?,
    };

    let SyncOutcome::Conflict {
        conflict_type,
        fields,
    } = &outcome
    else {
        return Ok(vec![outcome]);
    };

    let Some(strategy) = resolve else {
        return Err(CliError::UnresolvedConflict {
            conflict_type: conflict_type.to_string(),
            fields: join_fields(fields),
        });
    };
    tracing::info!(%strategy, "Resolving sync conflict");
    let resolved = manager.resolve_conflict(strategy).await?;
    Ok(vec![outcome, resolved])
}

pub async fn run_link(context: &CliContext, gist_id: &str) -> Result<(), CliError> {
    let gist_id = gist_id.trim();
    if gist_id.is_empty() {
        return Err(CliError::Config("Gist id cannot be empty".to_string()));
    }
    let mut manager = context.open_offline_manager().await?;
    manager.link_remote(RemoteHandle::new(gist_id)).await?;
    println!("Linked to Gist {gist_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use echo_nav_core::store::{MemoryRemote, MemoryStore};
    use echo_nav_core::sync::{build_config, ConflictField, ConflictType, DeviceIdentity};
    use echo_nav_core::{SyncSettings, SyncStatus, Website};
    use pretty_assertions::assert_eq;

    use super::*;

    fn website(id: &str, name: &str, minutes_ago: i64) -> Website {
        let mut website = Website::new(name, format!("https://{id}.example.com"));
        website.id = id.to_string();
        website.updated_at = Some(Utc::now() - Duration::minutes(minutes_ago));
        website
    }

    async fn manager_with_stale_remote() -> SyncManager<MemoryStore, MemoryRemote> {
        let remote = MemoryRemote::new();
        let identity = DeviceIdentity::new("device_other", "0.1.0");
        let mut remote_config = build_config(
            vec![website("a", "remote-a", 1), website("b", "B", 30)],
            Vec::new(),
            &SyncSettings::defaults(),
            &identity,
        );
        remote_config.metadata.last_sync = Utc::now() - Duration::hours(1);
        remote
            .insert_raw(
                &RemoteHandle::new("gist-1"),
                serde_json::to_value(&remote_config).unwrap(),
            )
            .unwrap();

        let local = MemoryStore::with_data(
            vec![website("a", "local-a", 10)],
            Vec::new(),
            SyncSettings::defaults(),
        );
        let mut manager = SyncManager::load(local, remote, "0.1.0").await.unwrap();
        manager.link_remote(RemoteHandle::new("gist-1")).await.unwrap();
        manager
    }

    #[tokio::test]
    async fn first_sync_uploads() {
        let local = MemoryStore::with_data(
            vec![website("a", "A", 0)],
            Vec::new(),
            SyncSettings::defaults(),
        );
        let mut manager = SyncManager::load(local, MemoryRemote::new(), "0.1.0")
            .await
            .unwrap();

        let outcomes = sync_with(&mut manager, SyncMode::Auto, None).await.unwrap();

        assert!(matches!(outcomes.as_slice(), [SyncOutcome::Uploaded(_)]));
        assert!(manager.remote_handle().is_some());
    }

    #[tokio::test]
    async fn conflict_without_strategy_is_reported() {
        let mut manager = manager_with_stale_remote().await;

        let error = sync_with(&mut manager, SyncMode::Pull, None)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            CliError::UnresolvedConflict { ref fields, .. } if fields == "websites"
        ));
        assert_eq!(manager.status(), SyncStatus::Conflict);
        assert!(manager.pending_conflict().is_some());
    }

    #[tokio::test]
    async fn conflict_with_strategy_is_resolved() {
        let mut manager = manager_with_stale_remote().await;

        let outcomes = sync_with(&mut manager, SyncMode::Auto, Some(MergeStrategy::Merge))
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[0],
            SyncOutcome::Conflict {
                conflict_type: ConflictType::LocalNewer,
                fields: vec![ConflictField::Websites],
            }
        );
        assert!(matches!(outcomes[1], SyncOutcome::Resolved(_)));

        let websites = manager.local().load_websites().await.unwrap();
        let names: Vec<&str> = websites.iter().map(|site| site.name.as_str()).collect();
        assert_eq!(names, vec!["remote-a", "B"]);
    }

    #[tokio::test]
    async fn pull_without_remote_fails() {
        let mut manager = SyncManager::load(MemoryStore::new(), MemoryRemote::new(), "0.1.0")
            .await
            .unwrap();

        let error = sync_with(&mut manager, SyncMode::Pull, None)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            CliError::Core(echo_nav_core::Error::MissingRemoteHandle)
        ));
    }

    #[tokio::test]
    async fn push_updates_existing_remote_document() {
        let remote = MemoryRemote::new();
        let existing = RemoteHandle::new("existing");
        let identity = DeviceIdentity::new("device_other", "0.1.0");
        let remote_config = build_config(
            vec![website("r", "Remote", 5)],
            Vec::new(),
            &SyncSettings::defaults(),
            &identity,
        );
        remote
            .insert_raw(&existing, serde_json::to_value(&remote_config).unwrap())
            .unwrap();
        let local = MemoryStore::with_data(
            vec![website("a", "A", 0)],
            Vec::new(),
            SyncSettings::defaults(),
        );
        let mut manager = SyncManager::load(local, remote, "0.1.0").await.unwrap();

        let outcomes = sync_with(&mut manager, SyncMode::Push, None).await.unwrap();

        assert!(matches!(outcomes.as_slice(), [SyncOutcome::Uploaded(_)]));
        assert_eq!(manager.remote_handle(), Some(&existing));
        assert_eq!(manager.remote().write_count().unwrap(), 1);
        let document = manager.remote().document(&existing).unwrap().unwrap();
        assert_eq!(document["websites"][0]["id"], "a");
        assert_eq!(
            manager
                .remote()
                .document(&RemoteHandle::new("memory-1"))
                .unwrap(),
            None
        );
    }
}
