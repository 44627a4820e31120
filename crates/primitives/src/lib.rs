//! Accessor layer for Stowage
//!
//! Typed, named handles over a key-value store:
//! - **Defaulted**: typed key with a fallback value
//! - **Optional**: typed key whose value may be absent
//! - **Observation**: cancelable subscription to one key's changes
//!
//! ## Design Principle: Stateless Handles
//!
//! Accessors hold only a key, an `Arc<dyn KeyValueStore>` and (for
//! `Defaulted`) the default. Every operation goes straight to the store, so:
//!
//! - any number of accessors may share a key
//! - there is no cache to invalidate
//! - accessors are `Send + Sync` and cheap to clone
//!
//! ```rust
//! use std::sync::Arc;
//! use stowage_primitives::{Accessor, Defaulted, Optional};
//! use stowage_storage::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let theme = Defaulted::with_store("theme", "light".to_string(), store.clone());
//! let token = Optional::<String>::with_store("token", store);
//!
//! let _watch = theme.observe(|value| println!("theme is now {value}"));
//! theme.set("dark".into());
//! token.set(None);
//! assert_eq!(theme.get(), "dark");
//! assert_eq!(token.get(), None);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessor;
pub mod observation;

pub use accessor::{Accessor, Defaulted, Optional};
pub use observation::{ObservedChange, Observation};
