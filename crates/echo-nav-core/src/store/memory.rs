//! In-memory store implementations

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use super::{LocalStore, RemoteHandle, RemoteStore};
use crate::error::{Error, Result};
use crate::models::{Category, SyncConfig, SyncSettings, Website};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|error| Error::Storage(error.to_string()))
}

#[derive(Debug, Default)]
struct LocalState {
    websites: Vec<Website>,
    categories: Vec<Category>,
    settings: SyncSettings,
    items: BTreeMap<String, Value>,
}

/// Volatile [`LocalStore`], used by tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<LocalState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with collections
    pub fn with_data(
        websites: Vec<Website>,
        categories: Vec<Category>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            state: Mutex::new(LocalState {
                websites,
                categories,
                settings,
                items: BTreeMap::new(),
            }),
        }
    }
}

impl LocalStore for MemoryStore {
    async fn load_websites(&self) -> Result<Vec<Website>> {
        Ok(lock(&self.state)?.websites.clone())
    }

    async fn load_categories(&self) -> Result<Vec<Category>> {
        Ok(lock(&self.state)?.categories.clone())
    }

    async fn load_settings(&self) -> Result<SyncSettings> {
        Ok(lock(&self.state)?.settings.clone())
    }

    async fn replace_websites(&self, websites: Vec<Website>) -> Result<()> {
        lock(&self.state)?.websites = websites;
        Ok(())
    }

    async fn replace_categories(&self, categories: Vec<Category>) -> Result<()> {
        lock(&self.state)?.categories = categories;
        Ok(())
    }

    async fn replace_settings(&self, settings: SyncSettings) -> Result<()> {
        lock(&self.state)?.settings = settings;
        Ok(())
    }

    async fn replace_all(
        &self,
        websites: Vec<Website>,
        categories: Vec<Category>,
        settings: SyncSettings,
    ) -> Result<()> {
        let mut state = lock(&self.state)?;
        state.websites = websites;
        state.categories = categories;
        state.settings = settings;
        Ok(())
    }

    async fn get_item(&self, key: &str) -> Result<Option<Value>> {
        Ok(lock(&self.state)?.items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: Value) -> Result<()> {
        lock(&self.state)?.items.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        lock(&self.state)?.items.remove(key);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct RemoteState {
    documents: BTreeMap<String, Value>,
    failure: Option<String>,
    writes: usize,
    next_id: u64,
}

/// Volatile [`RemoteStore`] with switchable failures
#[derive(Debug)]
pub struct MemoryRemote {
    authenticated: bool,
    state: Mutex<RemoteState>,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self {
            authenticated: true,
            state: Mutex::new(RemoteState::default()),
        }
    }

    /// A remote that reports missing credentials
    pub fn unauthenticated() -> Self {
        Self {
            authenticated: false,
            ..Self::new()
        }
    }

    /// Make every subsequent call fail with `message` (or succeed again with `None`)
    pub fn set_failure(&self, message: Option<&str>) -> Result<()> {
        lock(&self.state)?.failure = message.map(str::to_string);
        Ok(())
    }

    /// Store a raw document, bypassing serialization of a typed config
    pub fn insert_raw(&self, handle: &RemoteHandle, document: Value) -> Result<()> {
        lock(&self.state)?
            .documents
            .insert(handle.as_str().to_string(), document);
        Ok(())
    }

    pub fn document(&self, handle: &RemoteHandle) -> Result<Option<Value>> {
        Ok(lock(&self.state)?.documents.get(handle.as_str()).cloned())
    }

    /// Number of successful create/update calls
    pub fn write_count(&self) -> Result<usize> {
        Ok(lock(&self.state)?.writes)
    }

    fn check_failure(state: &RemoteState) -> Result<()> {
        match &state.failure {
            Some(message) => Err(Error::Remote(message.clone())),
            None => Ok(()),
        }
    }
}

impl RemoteStore for MemoryRemote {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn fetch(&self, handle: &RemoteHandle) -> Result<Value> {
        let state = lock(&self.state)?;
        Self::check_failure(&state)?;
        state
            .documents
            .get(handle.as_str())
            .cloned()
            .ok_or_else(|| Error::Remote(format!("document {handle} not found")))
    }

    async fn create(&self, config: &SyncConfig) -> Result<RemoteHandle> {
        let document = serde_json::to_value(config)?;
        let mut state = lock(&self.state)?;
        Self::check_failure(&state)?;
        state.next_id += 1;
        let handle = RemoteHandle::new(format!("memory-{}", state.next_id));
        state
            .documents
            .insert(handle.as_str().to_string(), document);
        state.writes += 1;
        Ok(handle)
    }

    async fn update(&self, handle: &RemoteHandle, config: &SyncConfig) -> Result<RemoteHandle> {
        let document = serde_json::to_value(config)?;
        let mut state = lock(&self.state)?;
        Self::check_failure(&state)?;
        if !state.documents.contains_key(handle.as_str()) {
            return Err(Error::Remote(format!("document {handle} not found")));
        }
        state
            .documents
            .insert(handle.as_str().to_string(), document);
        state.writes += 1;
        Ok(handle.clone())
    }

    async fn find(&self) -> Result<Option<RemoteHandle>> {
        let state = lock(&self.state)?;
        Self::check_failure(&state)?;
        Ok(state.documents.keys().next().map(RemoteHandle::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_replaces_collections() {
        let store = MemoryStore::new();
        store
            .replace_websites(vec![Website::new("Rust", "https://rust-lang.org")])
            .await
            .unwrap();
        assert_eq!(store.load_websites().await.unwrap().len(), 1);

        store.replace_websites(Vec::new()).await.unwrap();
        assert!(store.load_websites().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn memory_store_items_roundtrip_and_remove() {
        let store = MemoryStore::new();
        store
            .set_item("k", serde_json::json!({"a": 1}))
            .await
            .unwrap();
        assert_eq!(
            store.get_item("k").await.unwrap(),
            Some(serde_json::json!({"a": 1}))
        );
        store.remove_item("k").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_remote_failure_switch() {
        let remote = MemoryRemote::new();
        remote.set_failure(Some("offline")).unwrap();
        let error = remote.find().await.unwrap_err();
        assert!(error.to_string().contains("offline"));

        remote.set_failure(None).unwrap();
        assert_eq!(remote.find().await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_remote_update_requires_existing_document() {
        let remote = MemoryRemote::new();
        let handle = RemoteHandle::new("missing");
        let config = crate::sync::build_config(
            Vec::new(),
            Vec::new(),
            &SyncSettings::defaults(),
            &crate::sync::DeviceIdentity::new("device_test", "0.1.0"),
        );
        assert!(remote.update(&handle, &config).await.is_err());
        assert_eq!(remote.write_count().unwrap(), 0);
    }
}
