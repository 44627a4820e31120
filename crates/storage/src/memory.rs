//! In-memory preference store
//!
//! # Design
//!
//! - Values: `DashMap<String, StoreValue>`, sharded, lock-free reads
//! - Observers: `RwLock<FxHashMap<key, Vec<Registration>>>`
//! - Notifications are dispatched after every lock has been released, on
//!   the writing thread, so observers may call back into the store.
//!
//! # Notification order for one `set`
//!
//! 1. Prior notification to observers registered with `PRIOR`
//! 2. The write is applied
//! 3. Post notification to every observer of the key
//! 4. Snapshot flush, in `on_write` mode
//!
//! All four happen before `set` returns.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use stowage_core::{ObservingOptions, RawChange, Result, StoreValue};
use tracing::{debug, trace, warn};

use crate::config::{FlushMode, StoreConfig};
use crate::snapshot::{read_snapshot, write_snapshot};
use crate::traits::{ChangeObserver, KeyValueStore, ObserverId};

static STANDARD: Lazy<Arc<MemoryStore>> = Lazy::new(|| Arc::new(MemoryStore::new()));

#[derive(Clone)]
struct Registration {
    id: ObserverId,
    options: ObservingOptions,
    observer: Arc<dyn ChangeObserver>,
}

struct Persistence {
    path: PathBuf,
    mode: FlushMode,
    // Serializes flushes so concurrent writers never interleave temp files
    flush_lock: Mutex<()>,
}

/// Thread-safe, process-local key-value store
///
/// # Example
///
/// ```
/// use stowage_storage::{KeyValueStore, MemoryStore};
/// use stowage_core::StoreValue;
///
/// let store = MemoryStore::new();
/// store.set("launch_count", Some(StoreValue::Int(3)));
/// assert_eq!(store.get("launch_count"), Some(StoreValue::Int(3)));
///
/// store.set("launch_count", None);
/// assert!(!store.contains("launch_count"));
/// ```
pub struct MemoryStore {
    values: DashMap<String, StoreValue>,
    observers: RwLock<FxHashMap<String, Vec<Registration>>>,
    next_observer: AtomicU64,
    persistence: Option<Persistence>,
}

impl MemoryStore {
    /// Create an empty, purely in-memory store
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
            observers: RwLock::new(FxHashMap::default()),
            next_observer: AtomicU64::new(1),
            persistence: None,
        }
    }

    /// The process-wide shared store
    ///
    /// Accessors created without an explicit store bind to this instance.
    pub fn standard() -> Arc<MemoryStore> {
        Arc::clone(&STANDARD)
    }

    /// Open a store as described by `config`
    ///
    /// Loads the snapshot when `snapshot_path` is set and the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid flush mode or an unreadable snapshot.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let mode = config.flush_mode()?;
        let mut store = Self::new();
        if let Some(path) = &config.snapshot_path {
            for (key, value) in read_snapshot(path)? {
                store.values.insert(key, value);
            }
            store.persistence = Some(Persistence {
                path: path.clone(),
                mode,
                flush_lock: Mutex::new(()),
            });
        }
        debug!(target: "stowage::store", keys = store.len(), ?mode, "Store opened");
        Ok(store)
    }

    /// Write the snapshot to disk
    ///
    /// A no-op for stores without a snapshot path.
    pub fn flush(&self) -> Result<()> {
        let Some(persistence) = &self.persistence else {
            return Ok(());
        };
        let _guard = persistence.flush_lock.lock();
        write_snapshot(&persistence.path, &self.snapshot())
    }

    /// Copy of every stored key and value
    pub fn snapshot(&self) -> HashMap<String, StoreValue> {
        self.values
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Remove every key, notifying each key's observers
    pub fn reset(&self) {
        let keys: Vec<String> = self.keys();
        debug!(target: "stowage::store", keys = keys.len(), "Resetting store");
        for key in keys {
            self.set(&key, None);
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of live observer registrations for `key`
    pub fn observer_count(&self, key: &str) -> usize {
        self.observers.read().get(key).map_or(0, Vec::len)
    }

    fn registrations(&self, key: &str) -> Vec<Registration> {
        self.observers.read().get(key).cloned().unwrap_or_default()
    }

    fn flush_after_write(&self) {
        if let Some(persistence) = &self.persistence {
            if persistence.mode == FlushMode::OnWrite {
                if let Err(e) = self.flush() {
                    warn!(target: "stowage::store", error = %e, "Snapshot flush failed");
                }
            }
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("keys", &self.values.len())
            .field("observed_keys", &self.observers.read().len())
            .finish()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoreValue> {
        self.values.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: Option<StoreValue>) {
        let registrations = self.registrations(key);

        for reg in registrations
            .iter()
            .filter(|reg| reg.options.contains(ObservingOptions::PRIOR))
        {
            let change = RawChange::prior(reg.options, self.get(key));
            reg.observer.on_change(key, &change);
        }

        let new = if registrations.is_empty() {
            None
        } else {
            value.clone()
        };
        let old = match value {
            Some(v) => self.values.insert(key.to_string(), v),
            None => self.values.remove(key).map(|(_, v)| v),
        };
        trace!(target: "stowage::store", key, observers = registrations.len(), "Key written");

        for reg in &registrations {
            let change = RawChange::setting(reg.options, old.clone(), new.clone());
            reg.observer.on_change(key, &change);
        }

        self.flush_after_write();
    }

    fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.values.iter().map(|entry| entry.key().clone()).collect()
    }

    fn add_observer(
        &self,
        key: &str,
        options: ObservingOptions,
        observer: Arc<dyn ChangeObserver>,
    ) -> ObserverId {
        let id = ObserverId::new(self.next_observer.fetch_add(1, Ordering::Relaxed));
        self.observers
            .write()
            .entry(key.to_string())
            .or_default()
            .push(Registration {
                id,
                options,
                observer: Arc::clone(&observer),
            });
        debug!(target: "stowage::store", key, %id, ?options, "Observer added");

        if options.contains(ObservingOptions::INITIAL) {
            let change = RawChange::setting(options, None, self.get(key));
            observer.on_change(key, &change);
        }
        id
    }

    fn remove_observer(&self, key: &str, id: ObserverId) -> bool {
        let mut observers = self.observers.write();
        let Some(list) = observers.get_mut(key) else {
            return false;
        };
        let before = list.len();
        list.retain(|reg| reg.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            observers.remove(key);
        }
        if removed {
            debug!(target: "stowage::store", key, %id, "Observer removed");
        }
        removed
    }
}
