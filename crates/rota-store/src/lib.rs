//! # Rota Store
//!
//! Storage abstraction for Rota. The access-control core treats storage as
//! an injected key-value capability; this crate defines that capability as
//! the [`Store`] trait and ships SQLite and in-memory implementations.
//!
//! ## Key Types
//!
//! - [`Store`] - The async key-value trait
//! - [`StoreExt`] - Typed load/save of the permissions model on any store
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rota_store::{SqliteStore, StoreExt};
//! use rota_core::PermissionsModel;
//!
//! async fn example() {
//!     let store = SqliteStore::open("rota.db").unwrap();
//!
//!     store.save_model("permissions", &PermissionsModel::default()).await.unwrap();
//!     let model = store.load_model("permissions").await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-value writes**: a key is always replaced in full
//! - **Lenient model decoding**: missing roles or kinds and malformed scopes
//!   load as denial, never as an error

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Store, StoreExt};
