//! JSON-file backed local store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::LocalStore;
use crate::error::{Error, Result};
use crate::models::{Category, SyncSettings, Website};

const WEBSITES_FILE: &str = "websites.json";
const CATEGORIES_FILE: &str = "categories.json";
const SETTINGS_FILE: &str = "settings.json";
const ITEMS_DIR: &str = "items";

/// [`LocalStore`] keeping one JSON file per collection in a data directory.
///
/// Keyed items live under `items/<key>.json`. Writes go through a temporary
/// file and a rename, so readers never observe a half-written collection.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `root`
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(root.join(ITEMS_DIR)).await?;
        tracing::debug!(path = %root.display(), "Opened local store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn item_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(Error::InvalidInput(format!("invalid store key '{key}'")));
        }
        Ok(self.root.join(ITEMS_DIR).join(format!("{key}.json")))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
        let tmp_path = Self::stage_json(path, value).await?;
        tokio::fs::rename(&tmp_path, path).await?;
        Ok(())
    }

    /// Write `value` next to `path` without touching `path` itself
    async fn stage_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf> {
        let serialized = serde_json::to_string_pretty(value)?;
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, serialized).await?;
        Ok(tmp_path)
    }

    async fn discard_staged(staged: &[(PathBuf, PathBuf)]) {
        for (tmp_path, _) in staged {
            if let Err(error) = tokio::fs::remove_file(tmp_path).await {
                tracing::warn!(%error, path = %tmp_path.display(), "Failed to remove staged file");
            }
        }
    }

    async fn stage_all(
        &self,
        websites: &[Website],
        categories: &[Category],
        settings: &SyncSettings,
    ) -> Result<Vec<(PathBuf, PathBuf)>> {
        let mut staged = Vec::with_capacity(3);

        let targets = [
            (self.root.join(WEBSITES_FILE), serde_json::to_value(websites)),
            (self.root.join(CATEGORIES_FILE), serde_json::to_value(categories)),
            (self.root.join(SETTINGS_FILE), serde_json::to_value(settings)),
        ];
        for (path, value) in targets {
            let result = match value {
                Ok(value) => Self::stage_json(&path, &value).await,
                Err(error) => Err(error.into()),
            };
            match result {
                Ok(tmp_path) => staged.push((tmp_path, path)),
                Err(error) => {
                    Self::discard_staged(&staged).await;
                    return Err(error);
                }
            }
        }
        Ok(staged)
    }
}

impl LocalStore for JsonFileStore {
    async fn load_websites(&self) -> Result<Vec<Website>> {
        Ok(Self::read_json(&self.root.join(WEBSITES_FILE))
            .await?
            .unwrap_or_default())
    }

    async fn load_categories(&self) -> Result<Vec<Category>> {
        Ok(Self::read_json(&self.root.join(CATEGORIES_FILE))
            .await?
            .unwrap_or_default())
    }

    async fn load_settings(&self) -> Result<SyncSettings> {
        Ok(Self::read_json(&self.root.join(SETTINGS_FILE))
            .await?
            .unwrap_or_else(SyncSettings::defaults))
    }

    async fn replace_websites(&self, websites: Vec<Website>) -> Result<()> {
        Self::write_json(&self.root.join(WEBSITES_FILE), &websites).await
    }

    async fn replace_categories(&self, categories: Vec<Category>) -> Result<()> {
        Self::write_json(&self.root.join(CATEGORIES_FILE), &categories).await
    }

    async fn replace_settings(&self, settings: SyncSettings) -> Result<()> {
        Self::write_json(&self.root.join(SETTINGS_FILE), &settings).await
    }

    /// Stage every collection first and rename only once all are written.
    async fn replace_all(
        &self,
        websites: Vec<Website>,
        categories: Vec<Category>,
        settings: SyncSettings,
    ) -> Result<()> {
        let staged = self.stage_all(&websites, &categories, &settings).await?;
        for (tmp_path, path) in &staged {
            tokio::fs::rename(tmp_path, path).await?;
        }
        Ok(())
    }

    async fn get_item(&self, key: &str) -> Result<Option<Value>> {
        Self::read_json(&self.item_path(key)?).await
    }

    async fn set_item(&self, key: &str, value: Value) -> Result<()> {
        Self::write_json(&self.item_path(key)?, &value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.item_path(key)?).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
