//! Bridges between typed values and store values
//!
//! A `Bridge<T>` is a pair of pure conversion functions:
//!
//! - `serialize: Option<&T> -> Option<StoreValue>`
//! - `deserialize: Option<&StoreValue> -> Option<T>`
//!
//! ## Absence
//!
//! Absence is handled by the bridge itself, not by the conversion closures:
//! `serialize(None)` and `deserialize(None)` are always `None`. This is what
//! makes writing `None` through an accessor equivalent to removing the key.
//!
//! ## Failure
//!
//! Conversions never panic and never return errors. A value that cannot be
//! converted becomes `None`, and the failure is logged under the
//! `stowage::bridge` target.
//!
//! ## Round-trip law
//!
//! For every value `v` a bridge supports,
//! `deserialize(serialize(Some(&v)).as_ref()) == Some(v)`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use stowage_core::{Error, StoreValue};
use tracing::{debug, warn};

use crate::codec::{self, Encoding};
use crate::storable::{NativeValue, RawRepresentable, Storable};

type SerializeFn<T> = dyn Fn(&T) -> Option<StoreValue> + Send + Sync;
type DeserializeFn<T> = dyn Fn(&StoreValue) -> Option<T> + Send + Sync;

/// Converts between `T` and the store's native value shapes
///
/// # Example
///
/// ```
/// use stowage_bridge::Bridge;
/// use stowage_core::StoreValue;
///
/// struct Point { x: i64, y: i64 }
///
/// let bridge: Bridge<Point> = Bridge::new(
///     |p: &Point| Some(StoreValue::Array(vec![p.x.into(), p.y.into()])),
///     |stored: &StoreValue| match stored.as_array()? {
///         [x, y] => Some(Point { x: x.as_int()?, y: y.as_int()? }),
///         _ => None,
///     },
/// );
///
/// let stored = bridge.serialize(Some(&Point { x: 1, y: 2 }));
/// let point = bridge.deserialize(stored.as_ref()).unwrap();
/// assert_eq!((point.x, point.y), (1, 2));
/// ```
pub struct Bridge<T> {
    serialize: Arc<SerializeFn<T>>,
    deserialize: Arc<DeserializeFn<T>>,
}

impl<T> Clone for Bridge<T> {
    fn clone(&self) -> Self {
        Self {
            serialize: Arc::clone(&self.serialize),
            deserialize: Arc::clone(&self.deserialize),
        }
    }
}

impl<T> fmt::Debug for Bridge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bridge<{}>", type_name::<T>())
    }
}

impl<T> Bridge<T> {
    /// Manual bridge from two conversions over present values
    pub fn new(
        serialize: impl Fn(&T) -> Option<StoreValue> + Send + Sync + 'static,
        deserialize: impl Fn(&StoreValue) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            serialize: Arc::new(serialize),
            deserialize: Arc::new(deserialize),
        }
    }

    /// Convert a typed value into a store value
    pub fn serialize(&self, value: Option<&T>) -> Option<StoreValue> {
        value.and_then(|v| (self.serialize)(v))
    }

    /// Convert a store value into a typed value
    pub fn deserialize(&self, value: Option<&StoreValue>) -> Option<T> {
        value.and_then(|v| (self.deserialize)(v))
    }
}

impl<T: 'static> Bridge<T> {
    /// Derive a bridge for `U` by converting through `T`
    ///
    /// `to_inner` may reject values of `U` that `T` cannot represent, and
    /// `from_inner` may reject stored values that are not valid `U`s.
    pub fn map_bridge<U>(
        self,
        to_inner: impl Fn(&U) -> Option<T> + Send + Sync + 'static,
        from_inner: impl Fn(T) -> Option<U> + Send + Sync + 'static,
    ) -> Bridge<U> {
        let inner = self.clone();
        Bridge::new(
            move |value: &U| match to_inner(value) {
                Some(t) => self.serialize(Some(&t)),
                None => {
                    warn!(
                        target: "stowage::bridge",
                        from = type_name::<U>(),
                        to = type_name::<T>(),
                        "Value not representable, not stored"
                    );
                    None
                }
            },
            move |stored| inner.deserialize(Some(stored)).and_then(&from_inner),
        )
    }
}

impl<T: NativeValue + 'static> Bridge<T> {
    /// Identity pass-through for types that are already a store shape
    pub fn native() -> Self {
        Bridge::new(
            |value: &T| Some(value.to_store()),
            |stored| {
                let value = T::from_store(stored);
                if value.is_none() {
                    debug!(
                        target: "stowage::bridge",
                        error = %shape_mismatch::<T>(stored),
                        "Stored shape does not match"
                    );
                }
                value
            },
        )
    }
}

fn shape_mismatch<T>(stored: &StoreValue) -> Error {
    Error::TypeMismatch {
        expected: type_name::<T>(),
        actual: stored.type_name(),
    }
}

impl<T: Serialize + DeserializeOwned + 'static> Bridge<T> {
    /// Generic-encoding bridge using the default encoding (JSON)
    pub fn encoded() -> Self {
        Self::encoded_with(Encoding::default())
    }

    /// Generic-encoding bridge storing `T` as bytes in `encoding`
    pub fn encoded_with(encoding: Encoding) -> Self {
        Bridge::new(
            move |value: &T| match codec::encode(value, encoding) {
                Ok(bytes) => Some(StoreValue::Bytes(bytes)),
                Err(e) => {
                    warn!(
                        target: "stowage::bridge",
                        ty = type_name::<T>(),
                        encoding = encoding.name(),
                        error = %e,
                        "Encoding failed"
                    );
                    None
                }
            },
            move |stored| {
                let Some(bytes) = stored.as_bytes() else {
                    debug!(
                        target: "stowage::bridge",
                        ty = type_name::<T>(),
                        actual = stored.type_name(),
                        "Encoded value expects Bytes"
                    );
                    return None;
                };
                match codec::decode(bytes, encoding) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        warn!(
                            target: "stowage::bridge",
                            ty = type_name::<T>(),
                            encoding = encoding.name(),
                            error = %e,
                            "Decoding failed"
                        );
                        None
                    }
                }
            },
        )
    }
}

impl<T: RawRepresentable + 'static> Bridge<T> {
    /// Raw-value bridge for enumeration-like types
    ///
    /// Stores the raw value through the raw type's own bridge. A stored raw
    /// value that names no variant decodes to `None`.
    pub fn raw_value() -> Self {
        let raw = T::Raw::bridge();
        let raw_de = raw.clone();
        Bridge::new(
            move |value: &T| raw.serialize(Some(&value.raw_value())),
            move |stored| {
                let value = raw_de.deserialize(Some(stored)).and_then(T::from_raw_value);
                if value.is_none() {
                    debug!(
                        target: "stowage::bridge",
                        ty = type_name::<T>(),
                        "Stored raw value names no variant"
                    );
                }
                value
            },
        )
    }
}

impl<E: Storable> Bridge<Vec<E>> {
    /// Sequence bridge: every element goes through `E`'s bridge
    ///
    /// Elements that fail to serialize are left out of the stored array.
    /// On read, a stored value that is not an array is `None`, and elements
    /// that fail to decode are skipped.
    pub fn sequence() -> Self {
        let element = E::bridge();
        let element_de = element.clone();
        Bridge::new(
            move |values: &Vec<E>| {
                let mut stored = Vec::with_capacity(values.len());
                for (index, value) in values.iter().enumerate() {
                    match element.serialize(Some(value)) {
                        Some(v) => stored.push(v),
                        None => warn!(
                            target: "stowage::bridge",
                            ty = type_name::<E>(),
                            index,
                            "Dropping element that failed to serialize"
                        ),
                    }
                }
                Some(StoreValue::Array(stored))
            },
            move |stored| {
                let items = stored.as_array()?;
                let values: Vec<E> = items
                    .iter()
                    .filter_map(|item| element_de.deserialize(Some(item)))
                    .collect();
                if values.len() != items.len() {
                    debug!(
                        target: "stowage::bridge",
                        ty = type_name::<E>(),
                        skipped = items.len() - values.len(),
                        "Skipped undecodable elements"
                    );
                }
                Some(values)
            },
        )
    }
}

impl<V: Storable> Bridge<HashMap<String, V>> {
    /// Mapping bridge: every entry value goes through `V`'s bridge
    ///
    /// Same dropping rules as [`Bridge::sequence`], applied per entry.
    pub fn mapping() -> Self {
        let entry = V::bridge();
        let entry_de = entry.clone();
        Bridge::new(
            move |values: &HashMap<String, V>| {
                let mut stored = HashMap::with_capacity(values.len());
                for (key, value) in values {
                    match entry.serialize(Some(value)) {
                        Some(v) => {
                            stored.insert(key.clone(), v);
                        }
                        None => warn!(
                            target: "stowage::bridge",
                            ty = type_name::<V>(),
                            entry = %key,
                            "Dropping entry that failed to serialize"
                        ),
                    }
                }
                Some(StoreValue::Map(stored))
            },
            move |stored| {
                let items = stored.as_map()?;
                let values: HashMap<String, V> = items
                    .iter()
                    .filter_map(|(key, item)| {
                        entry_de.deserialize(Some(item)).map(|v| (key.clone(), v))
                    })
                    .collect();
                if values.len() != items.len() {
                    debug!(
                        target: "stowage::bridge",
                        ty = type_name::<V>(),
                        skipped = items.len() - values.len(),
                        "Skipped undecodable entries"
                    );
                }
                Some(values)
            },
        )
    }
}
