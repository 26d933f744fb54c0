//! Store trait: the abstract key-value capability the rest of Rota persists through.
//!
//! Implementations include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use rota_core::PermissionsModel;

use crate::error::Result;

/// Async key-value persistence.
///
/// Values are opaque bytes; callers own the encoding. Writes replace the
/// whole value under a key, there is no partial update.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`. Returns whether a value was present.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// All keys currently stored, sorted.
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Typed access to the permissions model on top of any [`Store`].
#[async_trait]
pub trait StoreExt: Store {
    /// Load the permissions model stored under `key`.
    ///
    /// Returns `None` when nothing is stored yet. Missing roles, kinds and
    /// malformed scopes decode to denial rather than failing.
    async fn load_model(&self, key: &str) -> Result<Option<PermissionsModel>>;

    /// Persist the permissions model under `key`.
    async fn save_model(&self, key: &str, model: &PermissionsModel) -> Result<()>;
}

#[async_trait]
impl<S: Store + ?Sized> StoreExt for S {
    async fn load_model(&self, key: &str) -> Result<Option<PermissionsModel>> {
        match self.get(key).await? {
            Some(bytes) => Ok(Some(PermissionsModel::from_json(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save_model(&self, key: &str, model: &PermissionsModel) -> Result<()> {
        let bytes = model.to_json()?;
        self.set(key, &bytes).await
    }
}
