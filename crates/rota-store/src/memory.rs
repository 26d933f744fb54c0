//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::traits::Store;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.write()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.write()?.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreExt;
    use rota_core::{PermissionKind, PermissionsModel, Role, Scope};

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();

        assert_eq!(store.get("a").await.unwrap(), None);

        store.set("a", b"one").await.unwrap();
        store.set("b", b"two").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(b"one".to_vec()));
        assert_eq!(store.keys().await.unwrap(), vec!["a", "b"]);

        store.set("a", b"uno").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(b"uno".to_vec()));

        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
        assert_eq!(store.keys().await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_model_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.load_model("permissions").await.unwrap().is_none());

        let mut model = PermissionsModel::default();
        model
            .get_mut(Role::Member)
            .set(PermissionKind::ViewIntegrations, Scope::All);
        store.save_model("permissions", &model).await.unwrap();

        let loaded = store.load_model("permissions").await.unwrap().unwrap();
        assert_eq!(loaded, model);
    }

    #[tokio::test]
    async fn test_load_partial_model() {
        let store = MemoryStore::new();
        store
            .set("permissions", br#"{"Owner":{"manageRoutines":"Team"}}"#)
            .await
            .unwrap();

        let loaded = store.load_model("permissions").await.unwrap().unwrap();
        assert_eq!(loaded.scope(Role::Owner, PermissionKind::ManageRoutines), Scope::Team);
        assert_eq!(loaded.scope(Role::Owner, PermissionKind::ViewRoutines), Scope::None);
        assert_eq!(loaded.scope(Role::Admin, PermissionKind::ManageRoutines), Scope::None);
    }

    #[tokio::test]
    async fn test_load_garbage_is_an_error() {
        let store = MemoryStore::new();
        store.set("permissions", b"not json").await.unwrap();

        assert!(matches!(
            store.load_model("permissions").await,
            Err(StoreError::Serialization(_))
        ));
    }
}
