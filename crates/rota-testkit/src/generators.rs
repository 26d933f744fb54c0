//! Proptest strategies for property-based testing.

use proptest::prelude::*;

use rota_core::{Member, PermissionKind, PermissionSet, PermissionsModel, Role, Routine, Scope};

/// Any of the four scopes.
pub fn scope() -> impl Strategy<Value = Scope> {
    prop::sample::select(Scope::ALL.to_vec())
}

/// Any role.
pub fn role() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

/// Any permission kind.
pub fn permission_kind() -> impl Strategy<Value = PermissionKind> {
    prop::sample::select(PermissionKind::ALL.to_vec())
}

/// A permission set with an arbitrary subset of kinds present.
pub fn permission_set() -> impl Strategy<Value = PermissionSet> {
    prop::collection::btree_map(permission_kind(), scope(), 0..=PermissionKind::ALL.len())
        .prop_map(|entries| entries.into_iter().collect())
}

/// A full permissions model built from three arbitrary sets.
pub fn permissions_model() -> impl Strategy<Value = PermissionsModel> {
    (permission_set(), permission_set(), permission_set())
        .prop_map(|(admin, owner, member)| PermissionsModel::new(admin, owner, member))
}

/// Members, routines and a chosen actor for evaluator properties.
#[derive(Debug, Clone)]
pub struct TeamDataset {
    /// Members with unique ids `0..n`.
    pub members: Vec<Member>,
    /// Routines; some owners may be ids no member has.
    pub routines: Vec<Routine>,
    /// Index of the actor in `members`.
    pub actor: usize,
}

impl TeamDataset {
    /// The acting member.
    pub fn actor(&self) -> &Member {
        &self.members[self.actor]
    }
}

/// Up to `max_members` members spread over three teams (or none), with
/// up to `max_routines` routines including dangling owners.
pub fn team_dataset(max_members: usize, max_routines: usize) -> impl Strategy<Value = TeamDataset> {
    prop::collection::vec((role(), prop::option::of(0u64..3)), 1..=max_members.max(1))
        .prop_flat_map(move |people| {
            let n = people.len();
            let owners = prop::collection::vec(0u64..(n as u64 + 2), 0..=max_routines);
            (Just(people), owners, 0..n)
        })
        .prop_map(|(people, owners, actor)| {
            let members = people
                .into_iter()
                .enumerate()
                .map(|(i, (role, team))| Member {
                    team_id: team.map(Into::into),
                    ..Member::new(i as u64, format!("member-{i}"), role)
                })
                .collect();
            let routines = owners
                .into_iter()
                .enumerate()
                .map(|(i, owner)| Routine::new(1000 + i as u64, owner, format!("routine-{i}")))
                .collect();
            TeamDataset {
                members,
                routines,
                actor,
            }
        })
}
