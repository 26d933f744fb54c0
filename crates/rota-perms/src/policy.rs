//! Policy evaluation.
//!
//! Every decision is a pure function of a [`PermissionSet`], the acting
//! [`Member`], and the resources (or members) in question. Nothing here
//! allocates state, performs I/O, or fails: unknown inputs deny.
//!
//! Team affiliation of a resource is never stored on the resource itself.
//! It is derived by joining the resource's owner against the member list,
//! so a resource whose owner is missing from that list (a dangling
//! reference) is neither visible under `Team` nor manageable.

use rota_core::{Member, Owned, PermissionKind, PermissionSet, Scope};

/// Whether the set grants `kind` at any scope above `None`.
pub fn has_capability(set: &PermissionSet, kind: PermissionKind) -> bool {
    set.scope(kind).grants()
}

/// Look up the owning member of a resource.
pub fn owner_of<'m, R: Owned + ?Sized>(resource: &R, members: &'m [Member]) -> Option<&'m Member> {
    let owner_id = resource.owner_id();
    members.iter().find(|m| m.id == owner_id)
}

/// Whether the resource's owner is in the actor's team.
///
/// Two members without a team compare equal here: an unassigned actor
/// shares a "team" with every other unassigned member.
fn same_team<R: Owned + ?Sized>(resource: &R, members: &[Member], actor: &Member) -> bool {
    owner_of(resource, members).is_some_and(|owner| owner.team_id == actor.team_id)
}

/// The subset of `resources` the actor may see, per its `viewRoutines` scope.
///
/// - `All`: every resource.
/// - `Team`: resources whose owner shares the actor's team.
/// - `Self`: resources the actor owns.
/// - `None`: nothing.
///
/// Input order is preserved.
pub fn filter_visible_resources<'r, R: Owned>(
    resources: &'r [R],
    members: &[Member],
    actor: &Member,
    set: &PermissionSet,
) -> Vec<&'r R> {
    match set.scope(PermissionKind::ViewRoutines) {
        Scope::All => resources.iter().collect(),
        Scope::Team => resources
            .iter()
            .filter(|r| same_team(*r, members, actor))
            .collect(),
        Scope::Own => resources
            .iter()
            .filter(|r| r.owner_id() == actor.id)
            .collect(),
        Scope::None => Vec::new(),
    }
}

/// The members the actor may manage through the member list, per its
/// `manageMembers` scope.
///
/// Under `Team` the actor itself is excluded; self-management goes through
/// a separate path. Under `All` the actor is included. Under `Self` only
/// the actor's own entry is returned.
pub fn filter_manageable_members<'m>(
    members: &'m [Member],
    actor: &Member,
    set: &PermissionSet,
) -> Vec<&'m Member> {
    match set.scope(PermissionKind::ManageMembers) {
        Scope::All => members.iter().collect(),
        Scope::Team => members
            .iter()
            .filter(|m| m.team_id == actor.team_id && m.id != actor.id)
            .collect(),
        Scope::Own => members.iter().filter(|m| m.id == actor.id).collect(),
        Scope::None => Vec::new(),
    }
}

/// Whether the actor may manage `resource` under the scope held for `kind`.
pub fn can_manage_with<R: Owned + ?Sized>(
    kind: PermissionKind,
    resource: &R,
    members: &[Member],
    actor: &Member,
    set: &PermissionSet,
) -> bool {
    match set.scope(kind) {
        Scope::All => true,
        Scope::Team => same_team(resource, members, actor),
        Scope::Own => resource.owner_id() == actor.id,
        Scope::None => false,
    }
}

/// Whether the actor may edit or delete `resource`, per its
/// `manageRoutines` scope. Editing and deleting share this one predicate.
pub fn can_manage_resource<R: Owned + ?Sized>(
    resource: &R,
    members: &[Member],
    actor: &Member,
    set: &PermissionSet,
) -> bool {
    can_manage_with(PermissionKind::ManageRoutines, resource, members, actor, set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_core::{Role, Routine};

    fn members() -> Vec<Member> {
        vec![
            Member::new(1, "Ana", Role::Owner).in_team(10),
            Member::new(2, "Ben", Role::Member).in_team(10),
            Member::new(3, "Cy", Role::Member).in_team(20),
            Member::new(4, "Dee", Role::Member).in_team(20),
            Member::new(7, "Eli", Role::Member).in_team(30),
        ]
    }

    fn view(scope: Scope) -> PermissionSet {
        PermissionSet::new().with(PermissionKind::ViewRoutines, scope)
    }

    fn manage_members(scope: Scope) -> PermissionSet {
        PermissionSet::new().with(PermissionKind::ManageMembers, scope)
    }

    fn manage_routines(scope: Scope) -> PermissionSet {
        PermissionSet::new().with(PermissionKind::ManageRoutines, scope)
    }

    #[test]
    fn test_has_capability() {
        let set = PermissionSet::new()
            .with(PermissionKind::ViewIntegrations, Scope::All)
            .with(PermissionKind::ManagePermissions, Scope::None);

        assert!(has_capability(&set, PermissionKind::ViewIntegrations));
        assert!(!has_capability(&set, PermissionKind::ManagePermissions));
        assert!(!has_capability(&set, PermissionKind::ManageTeams));
    }

    #[test]
    fn test_team_visibility_scenario() {
        let members = vec![
            Member::new(1, "a", Role::Member).in_team(10),
            Member::new(2, "b", Role::Member).in_team(10),
            Member::new(3, "c", Role::Member).in_team(20),
        ];
        let routines = vec![Routine::new(100, 1, "mine"), Routine::new(101, 3, "theirs")];
        let actor = members[0].clone();

        let visible = filter_visible_resources(&routines, &members, &actor, &view(Scope::Team));
        assert_eq!(visible, vec![&routines[0]]);
    }

    #[test]
    fn test_visibility_per_scope() {
        let members = members();
        let actor = members[0].clone();
        let routines = vec![
            Routine::new(100, 1, "a"),
            Routine::new(101, 3, "b"),
            Routine::new(102, 2, "c"),
            Routine::new(103, 99, "dangling"),
        ];

        let all = filter_visible_resources(&routines, &members, &actor, &view(Scope::All));
        assert_eq!(all.len(), 4);

        let team = filter_visible_resources(&routines, &members, &actor, &view(Scope::Team));
        let ids: Vec<u64> = team.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![100, 102]);

        let own = filter_visible_resources(&routines, &members, &actor, &view(Scope::Own));
        assert_eq!(own, vec![&routines[0]]);

        let none = filter_visible_resources(&routines, &members, &actor, &view(Scope::None));
        assert!(none.is_empty());
    }

    #[test]
    fn test_teamless_actor_sees_teamless_owners() {
        let members = vec![
            Member::new(1, "solo", Role::Member),
            Member::new(2, "also solo", Role::Member),
            Member::new(3, "teamed", Role::Member).in_team(10),
        ];
        let routines = vec![
            Routine::new(100, 2, "a"),
            Routine::new(101, 3, "b"),
            Routine::new(102, 1, "c"),
        ];
        let actor = members[0].clone();

        let visible = filter_visible_resources(&routines, &members, &actor, &view(Scope::Team));
        let ids: Vec<u64> = visible.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![100, 102]);
    }

    #[test]
    fn test_manageable_members_team_excludes_actor() {
        let members = members();
        let actor = members[2].clone();

        let manageable = filter_manageable_members(&members, &actor, &manage_members(Scope::Team));
        let ids: Vec<u64> = manageable.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn test_manageable_members_other_scopes() {
        let members = members();
        let actor = members[2].clone();

        let all = filter_manageable_members(&members, &actor, &manage_members(Scope::All));
        assert_eq!(all.len(), members.len());
        assert!(all.iter().any(|m| m.id == actor.id));

        let own = filter_manageable_members(&members, &actor, &manage_members(Scope::Own));
        assert_eq!(own, vec![&members[2]]);

        let none = filter_manageable_members(&members, &actor, &PermissionSet::new());
        assert!(none.is_empty());
    }

    #[test]
    fn test_can_manage_resource_team_scenario() {
        let members = members();
        let actor = Member::new(3, "Cy", Role::Member).in_team(20);
        let set = manage_routines(Scope::Team);

        let teammate_routine = Routine::new(200, 4, "teammate");
        let outsider_routine = Routine::new(201, 7, "outsider");
        let dangling_routine = Routine::new(202, 42, "dangling");

        assert!(can_manage_resource(&teammate_routine, &members, &actor, &set));
        assert!(!can_manage_resource(&outsider_routine, &members, &actor, &set));
        assert!(!can_manage_resource(&dangling_routine, &members, &actor, &set));
    }

    #[test]
    fn test_can_manage_resource_other_scopes() {
        let members = members();
        let actor = members[2].clone();
        let own = Routine::new(300, 3, "own");
        let foreign = Routine::new(301, 7, "foreign");
        let dangling = Routine::new(302, 42, "dangling");

        let all = manage_routines(Scope::All);
        assert!(can_manage_resource(&foreign, &members, &actor, &all));
        assert!(can_manage_resource(&dangling, &members, &actor, &all));

        let own_scope = manage_routines(Scope::Own);
        assert!(can_manage_resource(&own, &members, &actor, &own_scope));
        assert!(!can_manage_resource(&foreign, &members, &actor, &own_scope));

        assert!(!can_manage_resource(&own, &members, &actor, &PermissionSet::new()));
    }

    #[test]
    fn test_can_manage_with_uses_requested_kind() {
        let members = members();
        let actor = members[0].clone();
        let set = PermissionSet::new()
            .with(PermissionKind::ManageMembers, Scope::Team)
            .with(PermissionKind::ManageRoutines, Scope::None);

        let teammate = &members[1];
        assert!(can_manage_with(PermissionKind::ManageMembers, teammate, &members, &actor, &set));
        assert!(!can_manage_with(PermissionKind::ManageRoutines, teammate, &members, &actor, &set));
    }

    #[test]
    fn test_owner_of() {
        let members = members();
        assert_eq!(owner_of(&Routine::new(1, 4, "x"), &members).map(|m| m.id.0), Some(4));
        assert!(owner_of(&Routine::new(1, 5, "x"), &members).is_none());
    }
}
