//! # Rota Testkit
//!
//! Testing utilities for Rota.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a small organisation of members and routines, and
//!   helpers to open an access-control instance over memory storage
//! - **Generators**: Proptest strategies for property-based testing
//! - **Validators**: scripted, gated and seeded-random commit validators
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use rota_testkit::generators::{permission_set, team_dataset};
//!
//! proptest! {
//!     #[test]
//!     fn none_sees_nothing(data in team_dataset(8, 16), set in permission_set()) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Observing the optimistic write
//!
//! ```rust
//! use std::sync::Arc;
//! use rota::{PermissionStore, PermissionsModel};
//! use rota_testkit::GatedValidator;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let validator = Arc::new(GatedValidator::new());
//! let store = PermissionStore::new(Arc::clone(&validator));
//! let gate = validator.gate();
//! let reader = &store;
//!
//! let (result, ()) = tokio::join!(store.commit(PermissionsModel::deny_all()), async move {
//!     assert_eq!(reader.read(), PermissionsModel::deny_all());
//!     gate.reject("denied");
//! });
//! assert!(result.is_err());
//! assert_eq!(store.read(), PermissionsModel::default());
//! # });
//! ```

pub mod fixtures;
pub mod generators;
pub mod validators;

pub use fixtures::{init_tracing, visibility_scenario, Fixture};
pub use generators::{team_dataset, TeamDataset};
pub use validators::{FlakyValidator, Gate, GatedValidator, ScriptedValidator};
