//! AccessControl: unified API over the permission store and its persistence.
//!
//! Brings together the [`PermissionStore`], a [`Store`] backend and the
//! configuration into the object an application keeps for its lifetime.

use rota_core::{Member, PermissionKind, PermissionsModel, Routine};
use rota_perms::has_capability;
use rota_store::{Store, StoreExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::AccessConfig;
use crate::error::{AccessError, Result};
use crate::permissions::PermissionStore;
use crate::session::AccessSession;
use crate::validator::Validator;

/// The main access-control object.
///
/// Provides a unified API for:
/// - Loading the permissions model (seeding defaults at first launch)
/// - Committing and resetting the model, persisting each accepted state
/// - Handing out actor-scoped sessions
///
/// Storage always ends up holding the newest last-good model, even when
/// accepted commits overlap. A failed write restores the in-memory state
/// the operation started from, so memory and storage never disagree.
pub struct AccessControl<S: Store, V: Validator> {
    /// The storage backend.
    store: S,
    /// The live permissions model.
    permissions: PermissionStore<V>,
    /// Configuration.
    config: AccessConfig,
    /// Serializes writes to `store`.
    persist_lock: Mutex<()>,
}

impl<S: Store, V: Validator> AccessControl<S, V> {
    /// Open the access-control layer on top of `store`.
    ///
    /// Loads the persisted model, or starts from the default table when
    /// none exists (writing it back if `seed_defaults` is set).
    pub async fn open(store: S, validator: V, config: AccessConfig) -> Result<Self> {
        let model = match store.load_model(&config.storage_key).await? {
            Some(model) => {
                debug!(key = %config.storage_key, "loaded persisted permissions");
                model
            }
            None => {
                let defaults = PermissionsModel::default();
                if config.seed_defaults {
                    store.save_model(&config.storage_key, &defaults).await?;
                    info!(key = %config.storage_key, "seeded default permissions");
                }
                defaults
            }
        };

        Ok(Self {
            store,
            permissions: PermissionStore::with_model(model, validator, config.commit_ordering),
            config,
            persist_lock: Mutex::new(()),
        })
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The live permission store.
    pub fn permissions(&self) -> &PermissionStore<V> {
        &self.permissions
    }

    /// Active configuration.
    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Snapshot of the current model.
    pub fn read(&self) -> PermissionsModel {
        self.permissions.read()
    }

    /// Commit `model` and persist the resulting last-good model.
    ///
    /// Nothing is written to storage when the validator rejects. If the
    /// accepted model cannot be written, the permission store is put back
    /// on the last-good model from before the commit and the storage
    /// error is returned.
    pub async fn commit(&self, model: PermissionsModel) -> Result<()> {
        let before = self.permissions.last_good();
        self.permissions.commit(model).await?;
        self.persist_or_restore(before.clone(), before).await
    }

    /// Commit on behalf of `actor`, who must hold `managePermissions`
    /// under the model currently in force.
    pub async fn commit_as(&self, actor: &Member, model: PermissionsModel) -> Result<()> {
        let allowed = self.permissions.with_current(|current| {
            has_capability(current.get(actor.role), PermissionKind::ManagePermissions)
        });
        if !allowed {
            return Err(AccessError::NotAuthorized(format!(
                "{} ({}) may not manage permissions",
                actor.id, actor.role
            )));
        }

        self.commit(model).await
    }

    /// Reset to the default table and persist it.
    ///
    /// If the defaults cannot be written, the previous state is restored.
    pub async fn reset(&self) -> Result<()> {
        let (current, last_good) = self.permissions.snapshot();
        self.permissions.reset();
        self.persist_or_restore(current, last_good).await
    }

    /// Bind a query session for `actor` over the given application state.
    pub fn session<'a>(
        &'a self,
        actor: Option<&'a Member>,
        members: &'a [Member],
        routines: &'a [Routine],
    ) -> AccessSession<'a, V> {
        AccessSession::new(&self.permissions, actor, members, routines)
    }

    /// Write the last-good model, or put back `current`/`last_good` if the
    /// write fails.
    async fn persist_or_restore(
        &self,
        current: PermissionsModel,
        last_good: PermissionsModel,
    ) -> Result<()> {
        let _guard = self.persist_lock.lock().await;
        // Read under the lock: the last write always carries the newest model.
        let model = self.permissions.last_good();
        if let Err(e) = self.store.save_model(&self.config.storage_key, &model).await {
            warn!(key = %self.config.storage_key, error = %e, "failed to persist permissions");
            self.permissions.restore(current, last_good);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{AcceptAll, FnValidator, Rejection};
    use rota_core::{Role, Scope};
    use async_trait::async_trait;
    use rota_store::{MemoryStore, StoreError};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store whose writes start failing once `fail_writes` is set.
    #[derive(Default)]
    struct BrittleStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl Store for BrittleStore {
        async fn get(&self, key: &str) -> rota_store::Result<Option<Vec<u8>>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &[u8]) -> rota_store::Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Task("disk full".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn delete(&self, key: &str) -> rota_store::Result<bool> {
            self.inner.delete(key).await
        }

        async fn keys(&self) -> rota_store::Result<Vec<String>> {
            self.inner.keys().await
        }
    }

    fn member_sees_integrations() -> PermissionsModel {
        let mut model = PermissionsModel::default();
        model
            .get_mut(Role::Member)
            .set(PermissionKind::ViewIntegrations, Scope::All);
        model
    }

    #[tokio::test]
    async fn test_first_launch_seeds_defaults() {
        let access = AccessControl::open(MemoryStore::new(), AcceptAll, AccessConfig::default())
            .await
            .unwrap();

        assert_eq!(access.read(), PermissionsModel::default());
        let stored = access.store().load_model("permissions").await.unwrap();
        assert_eq!(stored, Some(PermissionsModel::default()));
    }

    #[tokio::test]
    async fn test_seeding_can_be_disabled() {
        let config = AccessConfig {
            seed_defaults: false,
            ..AccessConfig::default()
        };
        let access = AccessControl::open(MemoryStore::new(), AcceptAll, config)
            .await
            .unwrap();

        assert!(access.store().keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_opens_persisted_model() {
        let store = MemoryStore::new();
        store
            .save_model("permissions", &member_sees_integrations())
            .await
            .unwrap();

        let access = AccessControl::open(store, AcceptAll, AccessConfig::default())
            .await
            .unwrap();
        assert_eq!(access.read(), member_sees_integrations());
    }

    #[tokio::test]
    async fn test_commit_persists_only_accepted_models() {
        let validator = FnValidator::new(|model: &PermissionsModel| {
            if model.get(Role::Admin).scope(PermissionKind::ManagePermissions) == Scope::All {
                Ok(())
            } else {
                Err(Rejection::new("admins must keep managePermissions"))
            }
        });
        let access = AccessControl::open(MemoryStore::new(), validator, AccessConfig::default())
            .await
            .unwrap();

        access.commit(member_sees_integrations()).await.unwrap();
        let stored = access.store().load_model("permissions").await.unwrap();
        assert_eq!(stored, Some(member_sees_integrations()));

        let err = access.commit(PermissionsModel::deny_all()).await.unwrap_err();
        assert!(matches!(err, AccessError::ValidationRejected(_)));
        let stored = access.store().load_model("permissions").await.unwrap();
        assert_eq!(stored, Some(member_sees_integrations()));
        assert_eq!(access.read(), member_sees_integrations());
    }

    #[tokio::test]
    async fn test_commit_as_requires_manage_permissions() {
        let access = AccessControl::open(MemoryStore::new(), AcceptAll, AccessConfig::default())
            .await
            .unwrap();
        let admin = Member::new(1, "Ana", Role::Admin);
        let owner = Member::new(2, "Ben", Role::Owner);

        let err = access
            .commit_as(&owner, member_sees_integrations())
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::NotAuthorized(_)));
        assert_eq!(access.read(), PermissionsModel::default());

        access
            .commit_as(&admin, member_sees_integrations())
            .await
            .unwrap();
        assert_eq!(access.read(), member_sees_integrations());
    }

    #[tokio::test]
    async fn test_failed_write_restores_previous_model() {
        let access = AccessControl::open(BrittleStore::default(), AcceptAll, AccessConfig::default())
            .await
            .unwrap();
        access.commit(member_sees_integrations()).await.unwrap();
        access.store().fail_writes.store(true, Ordering::SeqCst);

        let err = access.commit(PermissionsModel::deny_all()).await.unwrap_err();

        assert!(matches!(err, AccessError::Store(_)));
        assert_eq!(access.read(), member_sees_integrations());
        assert_eq!(access.permissions().last_good(), member_sees_integrations());
        let stored = access.store().load_model("permissions").await.unwrap();
        assert_eq!(stored, Some(member_sees_integrations()));
    }

    #[tokio::test]
    async fn test_failed_reset_keeps_previous_model() {
        let access = AccessControl::open(BrittleStore::default(), AcceptAll, AccessConfig::default())
            .await
            .unwrap();
        access.commit(member_sees_integrations()).await.unwrap();
        access.store().fail_writes.store(true, Ordering::SeqCst);

        assert!(access.reset().await.is_err());

        assert_eq!(access.read(), member_sees_integrations());
        assert!(access.permissions().is_stable());
    }

    #[tokio::test]
    async fn test_overlapping_commits_persist_newest_model() {
        let access = AccessControl::open(MemoryStore::new(), AcceptAll, AccessConfig::default())
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            access.commit(member_sees_integrations()),
            access.commit(PermissionsModel::deny_all())
        );
        first.unwrap();
        second.unwrap();

        let stored = access.store().load_model("permissions").await.unwrap();
        assert_eq!(stored, Some(access.permissions().last_good()));
    }

    #[tokio::test]
    async fn test_reset_persists_defaults() {
        let access = AccessControl::open(MemoryStore::new(), AcceptAll, AccessConfig::default())
            .await
            .unwrap();
        access.commit(member_sees_integrations()).await.unwrap();

        access.reset().await.unwrap();

        assert_eq!(access.read(), PermissionsModel::default());
        let stored = access.store().load_model("permissions").await.unwrap();
        assert_eq!(stored, Some(PermissionsModel::default()));
    }

    #[tokio::test]
    async fn test_custom_storage_key() {
        let config = AccessConfig {
            storage_key: "team-42/permissions".to_string(),
            ..AccessConfig::default()
        };
        let access = AccessControl::open(MemoryStore::new(), AcceptAll, config)
            .await
            .unwrap();

        assert_eq!(
            access.store().keys().await.unwrap(),
            vec!["team-42/permissions".to_string()]
        );
        assert_eq!(access.config().storage_key, "team-42/permissions");
    }
}
