//! Stowage - typed, defaulted access to a key-value preference store
//!
//! Stowage sits between application code and a flat, string-keyed store of
//! primitive values. Each key gets a typed accessor that converts values
//! through a [`Bridge`], falls back to a default when nothing usable is
//! stored, and can be observed for changes.
//!
//! # Quick Start
//!
//! ```
//! use stowage::{Accessor, Defaulted, Optional};
//!
//! let launches = Defaulted::new("quickstart.launches", 0_i64);
//! launches.update(|n| *n += 1);
//! assert!(launches.get() >= 1);
//!
//! let user = Optional::<String>::new("quickstart.user");
//! let _watch = user.observe(|name| println!("user is now {name:?}"));
//! user.set(Some("far".into()));
//! user.set(None);
//! ```
//!
//! # Architecture
//!
//! - `stowage-core`: store value shapes, change payloads, errors
//! - `stowage-storage`: the [`KeyValueStore`] contract and [`MemoryStore`]
//! - `stowage-bridge`: [`Bridge`], [`Storable`] and the codecs
//! - `stowage-primitives`: [`Defaulted`], [`Optional`], [`Observation`]

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use stowage_bridge::{
    decode, encode, impl_storable, raw_representable, Bridge, ByteBuffer, Encoding, NativeValue,
    RawRepresentable, Storable,
};
pub use stowage_core::{
    ChangeKind, Error, ObservingOptions, RawChange, Result, StoreValue, Timestamp,
};
pub use stowage_primitives::{Accessor, Defaulted, ObservedChange, Observation, Optional};
pub use stowage_storage::{
    ChangeObserver, FlushMode, KeyValueStore, MemoryStore, ObserverId, StoreConfig,
};

/// Filter used when neither `RUST_LOG` nor the config names one
pub const DEFAULT_LOG_FILTER: &str = "warn";

static TRACING: OnceCell<()> = OnceCell::new();

/// Install a `fmt` subscriber filtered by `RUST_LOG` or `config.log_filter`
///
/// Only the first call has an effect. A subscriber installed elsewhere
/// beforehand is left in place.
pub fn init_tracing(config: &StoreConfig) {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| filter_for(config.log_filter.as_deref()));

        // Err means a global subscriber already exists
        let _ = tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .try_init();
    });
}

/// Parse the configured filter, falling back to `DEFAULT_LOG_FILTER` when
/// it is missing or invalid
fn filter_for(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_new(configured.unwrap_or(DEFAULT_LOG_FILTER))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
