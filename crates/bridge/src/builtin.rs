//! Built-in storable types
//!
//! - Native: `bool`, `i64`, `f32`, `f64`, `String`, [`ByteBuffer`],
//!   `Timestamp`, and `StoreValue` itself (untyped passthrough)
//! - Narrower integers (`i8`..`i32`, `u8`..`u64`), stored as `Int`;
//!   out-of-range values are rejected both ways. A `u64` above `i64::MAX`
//!   has no storable form, so writing one through an accessor clears the key
//! - `DateTime<Utc>` as `Timestamp`, `Url` as `String`
//! - `Vec<E>` and `HashMap<String, V>` for any storable `E` / `V`
//!
//! `HashMap<String, StoreValue>` and `Vec<StoreValue>` are the untyped
//! dictionary and array shapes. They round-trip exactly what the store
//! holds and nothing more.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::ops::Deref;
use stowage_core::{StoreValue, Timestamp};
use url::Url;

use crate::bridge::Bridge;
use crate::storable::{NativeValue, Storable};

/// Raw bytes, stored as `StoreValue::Bytes`
///
/// A plain `Vec<u8>` is a sequence of integers under the collection rule;
/// wrap it in `ByteBuffer` to store it as one byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteBuffer(pub Vec<u8>);

impl ByteBuffer {
    /// Unwrap the bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        ByteBuffer(bytes)
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        ByteBuffer(bytes.to_vec())
    }
}

impl Deref for ByteBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

macro_rules! native {
    ($ty:ty, $variant:ident, |$v:ident| $to:expr, |$s:ident| $from:expr) => {
        impl NativeValue for $ty {
            fn to_store(&self) -> StoreValue {
                let $v = self;
                StoreValue::$variant($to)
            }

            fn from_store(value: &StoreValue) -> Option<Self> {
                match value {
                    StoreValue::$variant($s) => Some($from),
                    _ => None,
                }
            }
        }

        impl Storable for $ty {
            fn bridge() -> Bridge<Self> {
                Bridge::native()
            }
        }
    };
}

native!(bool, Bool, |v| *v, |b| *b);
native!(i64, Int, |v| *v, |i| *i);
native!(f32, Float, |v| *v, |f| *f);
native!(f64, Double, |v| *v, |d| *d);
native!(String, String, |v| v.clone(), |s| s.clone());
native!(ByteBuffer, Bytes, |v| v.0.clone(), |b| ByteBuffer(b.clone()));
native!(Timestamp, Timestamp, |v| *v, |t| *t);

impl NativeValue for StoreValue {
    fn to_store(&self) -> StoreValue {
        self.clone()
    }

    fn from_store(value: &StoreValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl Storable for StoreValue {
    fn bridge() -> Bridge<Self> {
        Bridge::native()
    }
}

macro_rules! narrow_int {
    ($($ty:ty),+) => {
        $(
            impl Storable for $ty {
                fn bridge() -> Bridge<Self> {
                    i64::bridge().map_bridge(
                        |v: &$ty| i64::try_from(*v).ok(),
                        |i| <$ty>::try_from(i).ok(),
                    )
                }
            }
        )+
    };
}

narrow_int!(i8, i16, i32, u8, u16, u32, u64);

impl Storable for DateTime<Utc> {
    fn bridge() -> Bridge<Self> {
        Timestamp::bridge().map_bridge(
            |dt: &DateTime<Utc>| Some(Timestamp::from(*dt)),
            |ts| ts.to_datetime(),
        )
    }
}

impl Storable for Url {
    fn bridge() -> Bridge<Self> {
        String::bridge().map_bridge(
            |url: &Url| Some(url.as_str().to_string()),
            |s| Url::parse(&s).ok(),
        )
    }
}

impl<E: Storable> Storable for Vec<E> {
    fn bridge() -> Bridge<Self> {
        Bridge::sequence()
    }
}

impl<V: Storable> Storable for HashMap<String, V> {
    fn bridge() -> Bridge<Self> {
        Bridge::mapping()
    }
}
