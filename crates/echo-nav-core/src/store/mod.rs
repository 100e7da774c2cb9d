//! Local and remote store collaborators.
//!
//! The sync engine never owns the canonical collections. It reads snapshots
//! from a [`LocalStore`] and writes back whole replacement collections; the
//! [`RemoteStore`] is opaque JSON storage addressed by a [`RemoteHandle`].

mod file;
mod memory;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::{Category, SyncConfig, SyncSettings, Website};

pub use file::JsonFileStore;
pub use memory::{MemoryRemote, MemoryStore};

/// Opaque identifier of a remote config document (a Gist id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteHandle(String);

impl RemoteHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical local data plus small keyed JSON blobs
#[allow(async_fn_in_trait)]
pub trait LocalStore {
    async fn load_websites(&self) -> Result<Vec<Website>>;

    async fn load_categories(&self) -> Result<Vec<Category>>;

    async fn load_settings(&self) -> Result<SyncSettings>;

    /// Replace the whole website collection
    async fn replace_websites(&self, websites: Vec<Website>) -> Result<()>;

    /// Replace the whole category collection
    async fn replace_categories(&self, categories: Vec<Category>) -> Result<()>;

    async fn replace_settings(&self, settings: SyncSettings) -> Result<()>;

    /// Replace all three collections together.
    ///
    /// Nothing may be replaced when an error is returned before the commit
    /// step; a sync apply relies on this to avoid half-applied configs.
    async fn replace_all(
        &self,
        websites: Vec<Website>,
        categories: Vec<Category>,
        settings: SyncSettings,
    ) -> Result<()>;

    async fn get_item(&self, key: &str) -> Result<Option<Value>>;

    async fn set_item(&self, key: &str, value: Value) -> Result<()>;

    async fn remove_item(&self, key: &str) -> Result<()>;
}

/// Opaque remote key-value storage for sync configs
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Whether credentials are available for remote calls
    fn is_authenticated(&self) -> bool;

    /// Fetch the raw, untrusted document behind `handle`
    async fn fetch(&self, handle: &RemoteHandle) -> Result<Value>;

    async fn create(&self, config: &SyncConfig) -> Result<RemoteHandle>;

    async fn update(&self, handle: &RemoteHandle, config: &SyncConfig) -> Result<RemoteHandle>;

    /// Locate an existing config document, if any
    async fn find(&self) -> Result<Option<RemoteHandle>>;

    /// Update `handle` when present, otherwise create a new document
    async fn save(
        &self,
        config: &SyncConfig,
        handle: Option<&RemoteHandle>,
    ) -> Result<RemoteHandle> {
        match handle {
            Some(handle) => self.update(handle, config).await,
            None => self.create(config).await,
        }
    }
}

/// Read a keyed blob and deserialize it
pub async fn load_item<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: LocalStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get_item(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serialize a value and store it under `key`
pub async fn save_item<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: LocalStore + ?Sized,
    T: Serialize + ?Sized,
{
    store.set_item(key, serde_json::to_value(value)?).await
}
