//! Observation: typed, single-key, cancelable change subscriptions
//!
//! ## Lifecycle
//!
//! `Active -> Inactive`, exactly once. An observation registers with the
//! store when it is created and is active from that moment. It becomes
//! inactive on the first `cancel()` or when it is dropped. Further cancels
//! are no-ops, and exactly one deregistration reaches the store however
//! many threads cancel at once.
//!
//! ## Delivery vs. cancellation
//!
//! No lock is held while a handler runs. Each observation keeps a gate with
//! an `active` flag and a count of in-flight callbacks per thread:
//!
//! - delivery checks `active` and records itself under the gate lock, then
//!   releases the lock and runs the handler
//! - `cancel()` clears `active`, then waits until no callback is running on
//!   any other thread
//!
//! So once `cancel()` has returned, no callback can start, and a cancel
//! racing an in-flight callback waits for that callback to finish. Callbacks
//! running on the cancelling thread itself are not waited for, so a callback
//! may cancel its own observation. Callbacks of different observations never
//! contend, so callbacks may write to any key.
//!
//! Callbacks run on whichever thread performed the write. A callback must
//! not cancel an observation whose own callback, on another thread, is
//! waiting on the first one.

use parking_lot::{Condvar, Mutex};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use stowage_bridge::{Bridge, Storable};
use stowage_core::{ChangeKind, ObservingOptions, RawChange};
use stowage_storage::{ChangeObserver, KeyValueStore, ObserverId};
use tracing::{debug, trace, warn};

/// A decoded change to an observed key
///
/// `old_value` / `new_value` are `None` when the notification did not carry
/// that field (not requested, key absent) or when the stored value does not
/// decode as `T`. A mismatch never suppresses the notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedChange<T> {
    /// Kind of mutation
    pub kind: ChangeKind,
    /// Affected slots for element-level mutation of array values
    pub indices: Option<BTreeSet<usize>>,
    /// True for the notification sent before the change is applied
    pub is_prior: bool,
    /// Value before the change
    pub old_value: Option<T>,
    /// Value after the change
    pub new_value: Option<T>,
}

impl<T> ObservedChange<T> {
    /// Decode a raw payload through `bridge`
    pub fn decode(raw: &RawChange, bridge: &Bridge<T>) -> Self {
        ObservedChange {
            kind: raw.kind,
            indices: raw.indices.clone(),
            is_prior: raw.is_prior,
            old_value: bridge.deserialize(raw.old.as_ref()),
            new_value: bridge.deserialize(raw.new.as_ref()),
        }
    }
}

struct GateState {
    active: bool,
    in_flight: FxHashMap<ThreadId, usize>,
}

/// Delivery/cancel coordination for one observation
struct Gate {
    state: Mutex<GateState>,
    idle: Condvar,
}

impl Gate {
    fn new() -> Self {
        Gate {
            state: Mutex::new(GateState {
                active: true,
                in_flight: FxHashMap::default(),
            }),
            idle: Condvar::new(),
        }
    }

    fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Record a callback on this thread, or `None` once inactive
    fn enter(&self) -> Option<InFlight<'_>> {
        let mut state = self.state.lock();
        if !state.active {
            return None;
        }
        let thread = thread::current().id();
        *state.in_flight.entry(thread).or_insert(0) += 1;
        Some(InFlight { gate: self, thread })
    }

    /// Deactivate and wait out callbacks on other threads
    ///
    /// Returns true for the one call that performed the deactivation.
    fn close(&self) -> bool {
        let me = thread::current().id();
        let mut state = self.state.lock();
        let was_active = std::mem::replace(&mut state.active, false);
        while state.in_flight.keys().any(|thread| *thread != me) {
            self.idle.wait(&mut state);
        }
        was_active
    }
}

/// Marks a running callback; released even if the handler panics
struct InFlight<'a> {
    gate: &'a Gate,
    thread: ThreadId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.gate.state.lock();
        if let Some(count) = state.in_flight.get_mut(&self.thread) {
            *count -= 1;
            if *count == 0 {
                state.in_flight.remove(&self.thread);
            }
        }
        drop(state);
        self.gate.idle.notify_all();
    }
}

struct Dispatcher<T> {
    key: String,
    gate: Arc<Gate>,
    bridge: Bridge<T>,
    handler: Box<dyn Fn(ObservedChange<T>) + Send + Sync>,
}

impl<T: Storable> ChangeObserver for Dispatcher<T> {
    fn on_change(&self, key: &str, change: &RawChange) {
        // A misrouted notification is dropped; the subscription stays live
        // and only cancel() ends it.
        if key != self.key {
            warn!(
                target: "stowage::observe",
                expected = %self.key,
                actual = key,
                "Ignoring notification for another key"
            );
            return;
        }
        let Some(_in_flight) = self.gate.enter() else {
            trace!(target: "stowage::observe", key, "Dropping notification after cancel");
            return;
        };
        (self.handler)(ObservedChange::decode(change, &self.bridge));
    }
}

/// Handle to a live change subscription
///
/// Keep it alive for as long as notifications are wanted; dropping it
/// cancels the subscription.
#[must_use = "dropping an Observation cancels it immediately"]
pub struct Observation {
    store: Arc<dyn KeyValueStore>,
    key: String,
    id: ObserverId,
    gate: Arc<Gate>,
}

impl Observation {
    /// Register `handler` for changes to `key` in `store`
    ///
    /// Registration happens before this returns; with `INITIAL` in
    /// `options` the handler has already run once by then.
    pub fn new<T, F>(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        options: ObservingOptions,
        handler: F,
    ) -> Self
    where
        T: Storable,
        F: Fn(ObservedChange<T>) + Send + Sync + 'static,
    {
        let key = key.into();
        let gate = Arc::new(Gate::new());
        let dispatcher = Arc::new(Dispatcher {
            key: key.clone(),
            gate: Arc::clone(&gate),
            bridge: T::bridge(),
            handler: Box::new(handler),
        });
        let id = store.add_observer(&key, options, dispatcher);
        debug!(target: "stowage::observe", key = %key, %id, "Observation started");
        Observation {
            store,
            key,
            id,
            gate,
        }
    }

    /// The observed key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether notifications are still delivered
    pub fn is_active(&self) -> bool {
        self.gate.is_active()
    }

    /// Stop delivering notifications and deregister from the store
    ///
    /// Idempotent. Waits for callbacks running on other threads to finish.
    pub fn cancel(&self) {
        if !self.gate.close() {
            return;
        }
        self.store.remove_observer(&self.key, self.id);
        debug!(target: "stowage::observe", key = %self.key, id = %self.id, "Observation cancelled");
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
