//! Permission sets and the per-role permissions model.
//!
//! The [`PermissionsModel`] is the single source of truth for access
//! control. Its persisted shape is
//! `{ "<Role>": { "<permissionKind>": "<Scope>" } }`.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, Result};
use crate::scope::{PermissionKind, Role, Scope};

/// Mapping from permission kind to scope for a single role.
///
/// Absent kinds read as [`Scope::None`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<PermissionKind, Scope>);

impl PermissionSet {
    /// Create an empty set (every kind denied).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set with every kind at the same scope.
    pub fn full(scope: Scope) -> Self {
        Self(PermissionKind::ALL.into_iter().map(|k| (k, scope)).collect())
    }

    /// Builder-style insert.
    pub fn with(mut self, kind: PermissionKind, scope: Scope) -> Self {
        self.0.insert(kind, scope);
        self
    }

    /// Scope granted for a kind; `None` when the key is absent.
    pub fn scope(&self, kind: PermissionKind) -> Scope {
        self.0.get(&kind).copied().unwrap_or(Scope::None)
    }

    /// Set the scope for a kind.
    pub fn set(&mut self, kind: PermissionKind, scope: Scope) {
        self.0.insert(kind, scope);
    }

    /// Remove a kind entirely, returning its previous scope.
    pub fn remove(&mut self, kind: PermissionKind) -> Option<Scope> {
        self.0.remove(&kind)
    }

    /// Whether the key is explicitly present (regardless of its value).
    pub fn contains(&self, kind: PermissionKind) -> bool {
        self.0.contains_key(&kind)
    }

    /// Iterate over the explicitly present entries.
    pub fn iter(&self) -> impl Iterator<Item = (PermissionKind, Scope)> + '_ {
        self.0.iter().map(|(k, s)| (*k, *s))
    }

    /// Same set with every kind present, absent ones filled with `None`.
    pub fn normalized(&self) -> Self {
        Self(
            PermissionKind::ALL
                .into_iter()
                .map(|k| (k, self.scope(k)))
                .collect(),
        )
    }
}

impl FromIterator<(PermissionKind, Scope)> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = (PermissionKind, Scope)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(LenientSetVisitor)
    }
}

/// Decodes an object of kind/scope entries. Unknown kind keys are dropped
/// and any non-object value decodes to the empty set.
struct LenientSetVisitor;

impl<'de> Visitor<'de> for LenientSetVisitor {
    type Value = PermissionSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of permission kinds to scopes")
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> std::result::Result<PermissionSet, A::Error> {
        let mut set = PermissionSet::new();
        while let Some((key, scope)) = map.next_entry::<String, Scope>()? {
            if let Ok(kind) = key.parse::<PermissionKind>() {
                set.set(kind, scope);
            }
        }
        Ok(set)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<PermissionSet, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(PermissionSet::new())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> std::result::Result<PermissionSet, E> {
        Ok(PermissionSet::new())
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<PermissionSet, E> {
        Ok(PermissionSet::new())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<PermissionSet, E> {
        Ok(PermissionSet::new())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<PermissionSet, E> {
        Ok(PermissionSet::new())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<PermissionSet, E> {
        Ok(PermissionSet::new())
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<PermissionSet, E> {
        Ok(PermissionSet::new())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<PermissionSet, E> {
        Ok(PermissionSet::new())
    }
}

/// Mapping from role to permission set. Total over [`Role`].
///
/// A persisted model that omits a role, or holds a non-object for it,
/// decodes to an empty set for that role. Unknown role keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionsModel {
    #[serde(rename = "Admin")]
    admin: PermissionSet,

    #[serde(rename = "Owner")]
    owner: PermissionSet,

    #[serde(rename = "Member")]
    member: PermissionSet,
}

impl<'de> Deserialize<'de> for PermissionsModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut raw: BTreeMap<String, PermissionSet> = BTreeMap::deserialize(deserializer)?;
        let mut take = |role: Role| raw.remove(role.as_str()).unwrap_or_default();
        let (admin, owner, member) = (take(Role::Admin), take(Role::Owner), take(Role::Member));
        Ok(Self::new(admin, owner, member))
    }
}

impl PermissionsModel {
    /// Create a model from explicit per-role sets.
    pub fn new(admin: PermissionSet, owner: PermissionSet, member: PermissionSet) -> Self {
        Self {
            admin,
            owner,
            member,
        }
    }

    /// A model in which no role holds any permission.
    pub fn deny_all() -> Self {
        Self::new(PermissionSet::new(), PermissionSet::new(), PermissionSet::new())
    }

    /// The permission set of a role.
    pub fn get(&self, role: Role) -> &PermissionSet {
        match role {
            Role::Admin => &self.admin,
            Role::Owner => &self.owner,
            Role::Member => &self.member,
        }
    }

    /// Mutable access to the permission set of a role.
    pub fn get_mut(&mut self, role: Role) -> &mut PermissionSet {
        match role {
            Role::Admin => &mut self.admin,
            Role::Owner => &mut self.owner,
            Role::Member => &mut self.member,
        }
    }

    /// Builder-style replacement of a role's set.
    pub fn with_role(mut self, role: Role, set: PermissionSet) -> Self {
        *self.get_mut(role) = set;
        self
    }

    /// Shorthand for `get(role).scope(kind)`.
    pub fn scope(&self, role: Role, kind: PermissionKind) -> Scope {
        self.get(role).scope(kind)
    }

    /// Iterate over every role with its set.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &PermissionSet)> + '_ {
        Role::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    /// Encode to the persisted JSON layout.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    /// Decode from the persisted JSON layout.
    ///
    /// Missing roles, missing kinds and malformed scopes all decode to
    /// denial. Only input that is not a JSON object at all is an error.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}

impl Default for PermissionsModel {
    /// The table installed at first launch and on reset.
    fn default() -> Self {
        use PermissionKind::*;

        Self {
            admin: PermissionSet::full(Scope::All),
            owner: PermissionSet::new()
                .with(ManageMembers, Scope::Team)
                .with(ManageTeams, Scope::Team)
                .with(ManageRoutines, Scope::Team)
                .with(ViewRoutines, Scope::Team)
                .with(ViewIntegrations, Scope::All)
                .with(ManagePermissions, Scope::None),
            member: PermissionSet::new()
                .with(ManageMembers, Scope::Own)
                .with(ManageTeams, Scope::None)
                .with(ManageRoutines, Scope::Own)
                .with(ViewRoutines, Scope::Team)
                .with(ViewIntegrations, Scope::None)
                .with(ManagePermissions, Scope::None),
        }
    }
}
