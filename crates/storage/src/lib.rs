//! Storage layer for Stowage
//!
//! This crate provides:
//! - KeyValueStore: the store contract accessors are written against
//! - ChangeObserver / ObserverId: raw change notification
//! - MemoryStore: DashMap-backed, thread-safe store with synchronous
//!   notification and optional snapshot persistence
//! - StoreConfig: `stowage.toml` configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use config::{FlushMode, StoreConfig, CONFIG_FILE_NAME, SNAPSHOT_FILE_NAME};
pub use memory::MemoryStore;
pub use snapshot::{read_snapshot, write_snapshot};
pub use traits::{ChangeObserver, KeyValueStore, ObserverId};
