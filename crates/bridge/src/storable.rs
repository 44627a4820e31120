//! The Storable capability
//!
//! A type is storable when it can name its [`Bridge`]. The bridge is a
//! static property of the type, resolved at compile time through
//! `T::bridge()`; no runtime inspection of values is involved.
//!
//! ## Derivations
//!
//! | derivation | how | stored shape |
//! |---|---|---|
//! | manual | `impl Storable` returning `Bridge::new(..)` | whatever the closures produce |
//! | raw value | `impl_storable!(raw: T)` with `T: RawRepresentable` | the raw value's shape |
//! | encoded | `impl_storable!(encoded: T)` with `T: Serialize + DeserializeOwned` | `Bytes` |
//! | native | built in for primitives | identity |
//!
//! ## Precedence
//!
//! A type has exactly one `impl Storable`, so two derivations for the same
//! type are a coherence error rather than a silent choice. Where a type
//! qualifies for several, the one to pick is, highest first:
//!
//! 1. a manual bridge
//! 2. raw value, also when the type is serde-encodable
//! 3. generic encoding
//! 4. native identity
//!
//! An enum that derives `Serialize` and is also `RawRepresentable` must be
//! stored by its raw value, so `"far"` and not the JSON bytes `"\"far\""`.

use stowage_core::StoreValue;

use crate::bridge::Bridge;

/// A type with a static bridge to the store
pub trait Storable: Sized + 'static {
    /// The bridge converting `Self` to and from store values
    fn bridge() -> Bridge<Self>;
}

/// A type whose values map 1:1 onto a single store shape
///
/// Implementors get their bridge from [`Bridge::native`].
pub trait NativeValue: Sized {
    /// Wrap in the matching store shape
    fn to_store(&self) -> StoreValue;

    /// Unwrap, or `None` if `value` is a different shape
    fn from_store(value: &StoreValue) -> Option<Self>;
}

/// An enumeration-like type with an underlying primitive representation
///
/// Usually implemented with [`raw_representable!`](crate::raw_representable).
pub trait RawRepresentable: Sized {
    /// The primitive representation
    type Raw: Storable;

    /// This value's raw representation
    fn raw_value(&self) -> Self::Raw;

    /// The value for `raw`, or `None` if `raw` names no value
    fn from_raw_value(raw: Self::Raw) -> Option<Self>;
}

/// Implement [`Storable`] for one or more types by a derivation
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use stowage_bridge::{impl_storable, raw_representable, Encoding, Storable};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// enum Theme { Light, Dark }
///
/// raw_representable!(Theme: String {
///     Light => "light",
///     Dark => "dark",
/// });
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Window { width: u32, height: u32 }
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Session { token: String }
///
/// impl_storable!(raw: Theme);
/// impl_storable!(encoded: Window);
/// impl_storable!(encoded(Encoding::MessagePack): Session);
///
/// let stored = Theme::bridge().serialize(Some(&Theme::Dark));
/// assert_eq!(stored, Some("dark".into()));
/// ```
#[macro_export]
macro_rules! impl_storable {
    (raw: $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Storable for $ty {
                fn bridge() -> $crate::Bridge<Self> {
                    $crate::Bridge::raw_value()
                }
            }
        )+
    };
    (encoded: $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Storable for $ty {
                fn bridge() -> $crate::Bridge<Self> {
                    $crate::Bridge::encoded()
                }
            }
        )+
    };
    (encoded($encoding:expr): $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Storable for $ty {
                fn bridge() -> $crate::Bridge<Self> {
                    $crate::Bridge::encoded_with($encoding)
                }
            }
        )+
    };
}

/// Implement [`RawRepresentable`] for a fieldless enum
///
/// Each variant is paired with its raw value; any raw value not listed
/// converts back to `None`.
///
/// ```
/// use stowage_bridge::{raw_representable, RawRepresentable};
///
/// #[derive(Debug, PartialEq)]
/// enum Gender { Male, Female }
///
/// raw_representable!(Gender: i64 {
///     Male => 0,
///     Female => 1,
/// });
///
/// assert_eq!(Gender::Female.raw_value(), 1);
/// assert_eq!(Gender::from_raw_value(0), Some(Gender::Male));
/// assert_eq!(Gender::from_raw_value(7), None);
/// ```
#[macro_export]
macro_rules! raw_representable {
    ($ty:ident : $raw:ty { $($variant:ident => $value:expr),+ $(,)? }) => {
        impl $crate::RawRepresentable for $ty {
            type Raw = $raw;

            fn raw_value(&self) -> $raw {
                match self {
                    $( $ty::$variant => <$raw>::from($value), )+
                }
            }

            fn from_raw_value(raw: $raw) -> ::std::option::Option<Self> {
                $(
                    if raw == <$raw>::from($value) {
                        return ::std::option::Option::Some($ty::$variant);
                    }
                )+
                ::std::option::Option::None
            }
        }
    };
}
