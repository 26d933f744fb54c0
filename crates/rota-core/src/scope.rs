//! Roles, permission kinds and the scope lattice.
//!
//! A permission answers two questions: *what* capability is gated
//! ([`PermissionKind`]) and *how much* of the resource universe it covers
//! ([`Scope`]). Every [`Role`] carries one scope per kind.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Fixed category assigned to a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Owner,
    Member,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Owner, Role::Member];

    /// Wire name of the role.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Owner => "Owner",
            Role::Member => "Member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| CoreError::UnknownRole(s.to_string()))
    }
}

/// A named capability being gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionKind {
    ManageMembers,
    ManageTeams,
    ManageRoutines,
    ViewRoutines,
    ViewIntegrations,
    ManagePermissions,
}

impl PermissionKind {
    /// Every permission kind, in declaration order.
    pub const ALL: [PermissionKind; 6] = [
        PermissionKind::ManageMembers,
        PermissionKind::ManageTeams,
        PermissionKind::ManageRoutines,
        PermissionKind::ViewRoutines,
        PermissionKind::ViewIntegrations,
        PermissionKind::ManagePermissions,
    ];

    /// Wire name of the kind (camelCase).
    pub const fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::ManageMembers => "manageMembers",
            PermissionKind::ManageTeams => "manageTeams",
            PermissionKind::ManageRoutines => "manageRoutines",
            PermissionKind::ViewRoutines => "viewRoutines",
            PermissionKind::ViewIntegrations => "viewIntegrations",
            PermissionKind::ManagePermissions => "managePermissions",
        }
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownPermissionKind(s.to_string()))
    }
}

/// How much of the resource universe a permitted actor may act on.
///
/// Totally ordered: `None < Own < Team < All`. The same four values apply
/// to every [`PermissionKind`], including the all-or-nothing ones.
///
/// # Wire format
///
/// Encoded as one of the literals `"None"`, `"Self"`, `"Team"`, `"All"`.
/// Decoding is lenient: any other value, string or not, becomes
/// [`Scope::None`], so a malformed entry can never grant access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Scope {
    /// No access.
    #[default]
    None,
    /// Only resources owned by the actor. Encoded as `"Self"`.
    Own,
    /// Resources owned by anyone sharing the actor's team.
    Team,
    /// Every resource regardless of ownership.
    All,
}

impl Scope {
    /// Every scope, lowest first.
    pub const ALL: [Scope; 4] = [Scope::None, Scope::Own, Scope::Team, Scope::All];

    /// Wire literal of the scope.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Scope::None => "None",
            Scope::Own => "Self",
            Scope::Team => "Team",
            Scope::All => "All",
        }
    }

    /// Parse a wire literal, mapping anything unrecognised to `None`.
    pub fn parse_lenient(s: &str) -> Scope {
        match s {
            "Self" => Scope::Own,
            "Team" => Scope::Team,
            "All" => Scope::All,
            _ => Scope::None,
        }
    }

    /// Returns `true` for every scope other than `None`.
    pub const fn grants(&self) -> bool {
        !matches!(self, Scope::None)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LenientScopeVisitor)
    }
}

/// Accepts any scalar; only the four exact literals decode to a granting scope.
struct LenientScopeVisitor;

impl<'de> Visitor<'de> for LenientScopeVisitor {
    type Value = Scope;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scope literal")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scope, E> {
        Ok(Scope::parse_lenient(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Scope, E> {
        Ok(Scope::None)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Scope, E> {
        Ok(Scope::None)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Scope, E> {
        Ok(Scope::None)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Scope, E> {
        Ok(Scope::None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Scope, E> {
        Ok(Scope::None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Scope, E> {
        Ok(Scope::None)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Scope, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(Scope::None)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Scope, A::Error> {
        while map
            .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
            .is_some()
        {}
        Ok(Scope::None)
    }
}
