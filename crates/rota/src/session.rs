//! Actor-scoped queries.
//!
//! An [`AccessSession`] binds the policy evaluator to the currently
//! authenticated member and the live [`PermissionStore`], so callers ask
//! "can I ..." without passing the permission table around. Every query
//! reads the store at call time and therefore sees optimistic writes.
//!
//! Without an authenticated actor every query answers `false` or empty.

use rota_core::{Member, PermissionKind, PermissionSet, Routine, Scope};
use rota_perms::{
    can_manage_resource, filter_manageable_members, filter_visible_resources, has_capability,
};
use tracing::trace;

use crate::permissions::PermissionStore;
use crate::validator::Validator;

/// Query facade for one actor over the application's current members and routines.
pub struct AccessSession<'a, V> {
    permissions: &'a PermissionStore<V>,
    actor: Option<&'a Member>,
    members: &'a [Member],
    routines: &'a [Routine],
}

impl<'a, V: Validator> AccessSession<'a, V> {
    /// Bind a session. `actor` is `None` when nobody is signed in.
    pub fn new(
        permissions: &'a PermissionStore<V>,
        actor: Option<&'a Member>,
        members: &'a [Member],
        routines: &'a [Routine],
    ) -> Self {
        Self {
            permissions,
            actor,
            members,
            routines,
        }
    }

    /// The authenticated actor, if any.
    pub fn actor(&self) -> Option<&'a Member> {
        self.actor
    }

    /// Evaluate `f` against the actor and its role's current permission set.
    fn evaluate<T: Default>(&self, f: impl FnOnce(&Member, &PermissionSet) -> T) -> T {
        match self.actor {
            Some(actor) => self
                .permissions
                .with_current(|model| f(actor, model.get(actor.role))),
            None => T::default(),
        }
    }

    /// The actor's current scope for `kind`; `None` without an actor.
    pub fn scope(&self, kind: PermissionKind) -> Scope {
        self.evaluate(|_, set| set.scope(kind))
    }

    /// Whether the actor holds `kind` at any scope.
    pub fn has(&self, kind: PermissionKind) -> bool {
        self.evaluate(|_, set| has_capability(set, kind))
    }

    pub fn can_view_integrations(&self) -> bool {
        self.has(PermissionKind::ViewIntegrations)
    }

    pub fn can_manage_permissions(&self) -> bool {
        self.has(PermissionKind::ManagePermissions)
    }

    /// Routines the actor may see, in their original order.
    pub fn visible_routines(&self) -> Vec<&'a Routine> {
        let (routines, members) = (self.routines, self.members);
        self.evaluate(|actor, set| filter_visible_resources(routines, members, actor, set))
    }

    /// Members the actor may manage from the member list.
    pub fn manageable_members(&self) -> Vec<&'a Member> {
        let members = self.members;
        self.evaluate(|actor, set| filter_manageable_members(members, actor, set))
    }

    /// Whether the actor may edit `routine`.
    pub fn can_edit_routine(&self, routine: &Routine) -> bool {
        let allowed = self.evaluate(|actor, set| can_manage_resource(routine, self.members, actor, set));
        trace!(routine = %routine.id, allowed, "edit check");
        allowed
    }

    /// Whether the actor may delete `routine`. Same predicate as editing.
    pub fn can_delete_routine(&self, routine: &Routine) -> bool {
        let allowed = self.evaluate(|actor, set| can_manage_resource(routine, self.members, actor, set));
        trace!(routine = %routine.id, allowed, "delete check");
        allowed
    }
}
