//! # Rota Permissions
//!
//! The policy evaluator: pure functions that decide, for an actor and a
//! [`PermissionSet`](rota_core::PermissionSet), what the actor may see and
//! what it may change.
//!
//! ## Scope semantics
//!
//! | Scope  | Visible / manageable                                   |
//! |--------|--------------------------------------------------------|
//! | `All`  | everything                                             |
//! | `Team` | resources whose owner shares the actor's team          |
//! | `Self` | resources the actor owns                               |
//! | `None` | nothing                                                |
//!
//! Absent kinds and malformed scopes evaluate exactly like `None`.
//!
//! ## Usage
//!
//! ```rust
//! use rota_core::{Member, PermissionKind, PermissionSet, Role, Routine, Scope};
//! use rota_perms::{can_manage_resource, filter_visible_resources};
//!
//! let members = vec![
//!     Member::new(1, "Ana", Role::Member).in_team(10),
//!     Member::new(2, "Ben", Role::Member).in_team(10),
//! ];
//! let routines = vec![Routine::new(100, 2, "Standup")];
//! let set = PermissionSet::new()
//!     .with(PermissionKind::ViewRoutines, Scope::Team)
//!     .with(PermissionKind::ManageRoutines, Scope::Own);
//!
//! let visible = filter_visible_resources(&routines, &members, &members[0], &set);
//! assert_eq!(visible.len(), 1);
//! assert!(!can_manage_resource(&routines[0], &members, &members[0], &set));
//! ```

pub mod policy;

pub use policy::{
    can_manage_resource, can_manage_with, filter_manageable_members, filter_visible_resources,
    has_capability, owner_of,
};
