//! Store and observer abstractions
//!
//! `KeyValueStore` is the contract the accessor layer is written against.
//! `MemoryStore` is the implementation shipped here; anything else that can
//! hold string-keyed `StoreValue`s and report writes can stand in for it.

use std::fmt;
use std::sync::Arc;
use stowage_core::{ObservingOptions, RawChange, StoreValue};

/// Token identifying one observer registration
///
/// Returned by [`KeyValueStore::add_observer`]; deregistration takes the same
/// key plus this token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Wrap a raw id
    pub const fn new(raw: u64) -> Self {
        ObserverId(raw)
    }

    /// Raw id value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// Receiver of raw change notifications
///
/// Called synchronously on the thread that performed the write. A store
/// never holds its own locks while calling an observer, so observers may
/// read and write the store re-entrantly.
pub trait ChangeObserver: Send + Sync {
    /// A registered key changed
    fn on_change(&self, key: &str, change: &RawChange);
}

/// Flat, string-keyed store of `StoreValue`s with change notification
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads. The store is the only arbiter of consistency for raw
/// reads and writes.
pub trait KeyValueStore: Send + Sync {
    /// Current value for `key`
    fn get(&self, key: &str) -> Option<StoreValue>;

    /// Write `value` under `key`; `None` removes the key
    ///
    /// Every call notifies the key's observers exactly once (plus once more
    /// beforehand for observers registered with `PRIOR`) before returning.
    fn set(&self, key: &str, value: Option<StoreValue>);

    /// Remove `key`
    fn remove(&self, key: &str) {
        self.set(key, None);
    }

    /// Whether `key` currently holds a value
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All keys currently holding a value, in no particular order
    fn keys(&self) -> Vec<String>;

    /// Register `observer` for changes to `key`
    fn add_observer(
        &self,
        key: &str,
        options: ObservingOptions,
        observer: Arc<dyn ChangeObserver>,
    ) -> ObserverId;

    /// Deregister a previous registration
    ///
    /// Returns `false` if no such registration exists.
    fn remove_observer(&self, key: &str, id: ObserverId) -> bool;
}
