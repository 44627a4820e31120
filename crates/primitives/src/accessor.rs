//! Typed accessors over a key-value store
//!
//! An accessor is a named, store-bound handle for one key:
//!
//! - [`Defaulted<T>`]: reads never come back empty; the default shows
//!   through whenever the key is absent or does not decode as `T`
//! - [`Optional<T>`]: reads return `Option<T>`; writing `None` removes the key
//!
//! Accessors hold no mutable state. Every read goes to the store and every
//! write converts through `T::bridge()` and lands in the store before
//! returning. Two accessors bound to the same key and store observe the same
//! value.

use std::fmt;
use std::sync::Arc;
use stowage_bridge::Storable;
use stowage_core::ObservingOptions;
use stowage_storage::{KeyValueStore, MemoryStore};
use tracing::warn;

use crate::observation::{ObservedChange, Observation};

/// Operations shared by every accessor
pub trait Accessor {
    /// The storable type behind the key
    type Value: Storable;

    /// What `get` returns: `T` or `Option<T>`
    type Wrapped;

    /// The bound key
    fn key(&self) -> &str;

    /// The bound store
    fn store(&self) -> &Arc<dyn KeyValueStore>;

    /// Read the current value
    fn get(&self) -> Self::Wrapped;

    /// Write a value; fires the store's notification once, synchronously
    fn set(&self, value: Self::Wrapped);

    /// Subscribe to new values only
    ///
    /// `Defaulted` skips changes whose new value is absent or does not
    /// decode; `Optional` delivers them as `None`.
    fn observe<F>(&self, handler: F) -> Observation
    where
        F: Fn(Self::Wrapped) + Send + Sync + 'static;

    /// Whether the store currently holds the key
    fn is_set(&self) -> bool {
        self.store().contains(self.key())
    }

    /// Remove the key
    fn reset(&self) {
        self.store().remove(self.key());
    }

    /// Subscribe to decoded changes of the key
    fn observe_with<F>(&self, options: ObservingOptions, handler: F) -> Observation
    where
        F: Fn(ObservedChange<Self::Value>) + Send + Sync + 'static,
    {
        Observation::new(Arc::clone(self.store()), self.key(), options, handler)
    }
}

fn write<T: Storable>(store: &dyn KeyValueStore, key: &str, value: Option<&T>) {
    let stored = T::bridge().serialize(value);
    if value.is_some() && stored.is_none() {
        warn!(
            target: "stowage::bridge",
            key,
            ty = std::any::type_name::<T>(),
            "Value has no storable form, clearing key"
        );
    }
    store.set(key, stored);
}

fn read<T: Storable>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    T::bridge().deserialize(store.get(key).as_ref())
}

// ============================================================================
// Defaulted
// ============================================================================

/// Accessor that always yields a value
///
/// ```
/// use std::sync::Arc;
/// use stowage_primitives::{Accessor, Defaulted};
/// use stowage_storage::MemoryStore;
///
/// let store = Arc::new(MemoryStore::new());
/// let launches = Defaulted::with_store("launches", 0_i64, store);
/// assert_eq!(launches.get(), 0);
/// launches.update(|n| *n += 1);
/// assert_eq!(launches.get(), 1);
/// ```
#[derive(Clone)]
pub struct Defaulted<T> {
    key: String,
    store: Arc<dyn KeyValueStore>,
    default: T,
}

impl<T: Storable + Clone + Send + Sync> Defaulted<T> {
    /// Bind `key` on the process-wide standard store
    pub fn new(key: impl Into<String>, default: T) -> Self {
        Self::with_store(key, default, MemoryStore::standard())
    }

    /// Bind `key` on `store`
    pub fn with_store(key: impl Into<String>, default: T, store: Arc<dyn KeyValueStore>) -> Self {
        Defaulted {
            key: key.into(),
            store,
            default,
        }
    }

    /// The fallback value
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Read, mutate in place, write back
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }
}

impl<T: Storable + Clone + Send + Sync> Accessor for Defaulted<T> {
    type Value = T;
    type Wrapped = T;

    fn key(&self) -> &str {
        &self.key
    }

    fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    fn get(&self) -> T {
        read(self.store.as_ref(), &self.key).unwrap_or_else(|| self.default.clone())
    }

    fn set(&self, value: T) {
        write(self.store.as_ref(), &self.key, Some(&value));
    }

    fn observe<F>(&self, handler: F) -> Observation
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.observe_with(ObservingOptions::NEW, move |change: ObservedChange<T>| {
            if let Some(value) = change.new_value {
                handler(value)
            }
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for Defaulted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Defaulted")
            .field("key", &self.key)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Optional
// ============================================================================

/// Accessor whose value may be absent
pub struct Optional<T> {
    key: String,
    store: Arc<dyn KeyValueStore>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: Storable> Optional<T> {
    /// Bind `key` on the process-wide standard store
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_store(key, MemoryStore::standard())
    }

    /// Bind `key` on `store`
    pub fn with_store(key: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Optional {
            key: key.into(),
            store,
            _marker: std::marker::PhantomData,
        }
    }

    /// Read, mutate in place, write back
    pub fn update(&self, f: impl FnOnce(&mut Option<T>)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// Read the value and remove the key
    pub fn take(&self) -> Option<T> {
        let value = self.get();
        self.store.remove(&self.key);
        value
    }
}

impl<T: Storable> Accessor for Optional<T> {
    type Value = T;
    type Wrapped = Option<T>;

    fn key(&self) -> &str {
        &self.key
    }

    fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    fn get(&self) -> Option<T> {
        read(self.store.as_ref(), &self.key)
    }

    fn set(&self, value: Option<T>) {
        write(self.store.as_ref(), &self.key, value.as_ref());
    }

    fn observe<F>(&self, handler: F) -> Observation
    where
        F: Fn(Option<T>) + Send + Sync + 'static,
    {
        self.observe_with(ObservingOptions::NEW, move |change: ObservedChange<T>| {
            handler(change.new_value)
        })
    }
}

impl<T> Clone for Optional<T> {
    fn clone(&self) -> Self {
        Optional {
            key: self.key.clone(),
            store: Arc::clone(&self.store),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> fmt::Debug for Optional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Optional")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
