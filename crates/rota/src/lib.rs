//! # Rota
//!
//! Role-based, scope-qualified access control for a team scheduling
//! application: who may see, edit or delete which routines and members.
//!
//! ## Overview
//!
//! - **Model**: each [`Role`] holds a [`Scope`] (`None < Self < Team < All`)
//!   per [`PermissionKind`]
//! - **Evaluator**: pure functions deciding visibility and manageability
//!   against ownership and team membership
//! - **Permission store**: the live model, changed wholesale through an
//!   optimistic commit that rolls back when the [`Validator`] rejects
//! - **Sessions**: "can I ..." queries bound to the signed-in member
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rota::{AccessConfig, AccessControl, AcceptAll, Member, Role, Routine};
//! use rota::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("rota.db").unwrap();
//!     let access = AccessControl::open(store, AcceptAll, AccessConfig::default())
//!         .await
//!         .unwrap();
//!
//!     let members = vec![Member::new(1, "Ana", Role::Member).in_team(10)];
//!     let routines = vec![Routine::new(100, 1, "Standup")];
//!
//!     let session = access.session(Some(&members[0]), &members, &routines);
//!     let visible = session.visible_routines();
//!     let editable = session.can_edit_routine(&routines[0]);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `rota::core` - Data model (roles, scopes, members, routines)
//! - `rota::perms` - Policy evaluator
//! - `rota::store` - Key-value persistence

pub mod access;
pub mod config;
pub mod error;
pub mod permissions;
pub mod session;
pub mod validator;

// Re-export component crates
pub use rota_core as core;
pub use rota_perms as perms;
pub use rota_store as store;

pub use access::AccessControl;
pub use config::{AccessConfig, CommitOrdering};
pub use error::{AccessError, Result};
pub use permissions::PermissionStore;
pub use session::AccessSession;
pub use validator::{AcceptAll, FnValidator, Rejection, Validator};

// Re-export commonly used core types
pub use rota_core::{
    Member, MemberId, Owned, PermissionKind, PermissionSet, PermissionsModel, Role, Routine,
    RoutineId, RoutineKind, Scope, TeamId,
};
