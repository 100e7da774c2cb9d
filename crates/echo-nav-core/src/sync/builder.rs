//! Local snapshot construction and device identity

use chrono::Utc;
use serde_json::Value;

use crate::config::DEVICE_ID_KEY;
use crate::error::Result;
use crate::models::{Category, SyncConfig, SyncMetadata, SyncSettings, Website, SYNC_CONFIG_VERSION};
use crate::store::LocalStore;

/// Identity stamped into the metadata of configs produced on this device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub app_version: String,
}

impl DeviceIdentity {
    pub fn new(device_id: impl Into<String>, app_version: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            app_version: app_version.into(),
        }
    }
}

/// Snapshot local collections into a fresh [`SyncConfig`] stamped now.
#[must_use]
pub fn build_config(
    websites: Vec<Website>,
    categories: Vec<Category>,
    settings: &SyncSettings,
    identity: &DeviceIdentity,
) -> SyncConfig {
    SyncConfig {
        websites,
        categories,
        settings: settings.resolved(),
        metadata: SyncMetadata {
            version: SYNC_CONFIG_VERSION.to_string(),
            last_sync: Utc::now(),
            device_id: identity.device_id.clone(),
            app_version: identity.app_version.clone(),
        },
    }
}

/// Return the persisted device id, generating one on first use.
///
/// A new id is `device_` followed by a UUID v7 (millisecond timestamp plus
/// random bits). Persisting it is best-effort: on failure the generated id
/// is still returned and a new one will be generated next launch.
pub async fn load_or_create_device_id<S: LocalStore + ?Sized>(store: &S) -> Result<String> {
    if let Some(Value::String(existing)) = store.get_item(DEVICE_ID_KEY).await? {
        if !existing.trim().is_empty() {
            return Ok(existing);
        }
    }

    let device_id = format!("device_{}", uuid::Uuid::now_v7().simple());
    if let Err(error) = store
        .set_item(DEVICE_ID_KEY, Value::String(device_id.clone()))
        .await
    {
        tracing::warn!(%error, "Failed to persist device id");
    }
    tracing::info!(device_id = %device_id, "Generated new device id");
    Ok(device_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThemeMode;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn device_id_is_generated_once() {
        let store = MemoryStore::new();
        let first = load_or_create_device_id(&store).await.unwrap();
        let second = load_or_create_device_id(&store).await.unwrap();

        assert!(first.starts_with("device_"));
        assert_eq!(first, second);
        assert_eq!(
            store.get_item(DEVICE_ID_KEY).await.unwrap(),
            Some(Value::String(first))
        );
    }

    #[tokio::test]
    async fn device_id_is_regenerated_when_blank() {
        let store = MemoryStore::new();
        store
            .set_item(DEVICE_ID_KEY, Value::String("  ".to_string()))
            .await
            .unwrap();
        let device_id = load_or_create_device_id(&store).await.unwrap();
        assert!(device_id.starts_with("device_"));
    }

    #[test]
    fn build_config_stamps_metadata_and_fills_settings() {
        let identity = DeviceIdentity::new("device_abc", "1.2.3");
        let settings = SyncSettings {
            theme: Some(ThemeMode::Dark),
            ..SyncSettings::default()
        };
        let before = Utc::now();
        let config = build_config(
            vec![Website::new("Rust", "https://rust-lang.org")],
            Vec::new(),
            &settings,
            &identity,
        );

        assert_eq!(config.websites.len(), 1);
        assert_eq!(config.metadata.version, SYNC_CONFIG_VERSION);
        assert_eq!(config.metadata.device_id, "device_abc");
        assert_eq!(config.metadata.app_version, "1.2.3");
        assert!(config.metadata.last_sync >= before);
        assert_eq!(config.settings.theme, Some(ThemeMode::Dark));
        assert_eq!(config.settings.show_categories, Some(true));
    }
}
