//! # Rota Core
//!
//! The access-control data model for Rota: roles, permission kinds, the
//! four-level scope lattice, and the member/routine shapes the policy
//! evaluator reasons about.
//!
//! This crate contains no I/O and no policy logic. It is pure data.
//!
//! ## Key Types
//!
//! - [`Role`] - Fixed category of a member (`Admin`, `Owner`, `Member`)
//! - [`PermissionKind`] - The capability being gated
//! - [`Scope`] - `None < Self < Team < All`, how much of the universe a grant covers
//! - [`PermissionSet`] - Kind to scope for one role; absent kinds are `None`
//! - [`PermissionsModel`] - Role to permission set, total over roles
//! - [`Owned`] - Anything with an owning member

pub mod entity;
pub mod error;
pub mod model;
pub mod scope;
pub mod types;

pub use entity::{Member, Owned, Routine, RoutineKind};
pub use error::{CoreError, Result};
pub use model::{PermissionSet, PermissionsModel};
pub use scope::{PermissionKind, Role, Scope};
pub use types::{MemberId, RoutineId, TeamId};
