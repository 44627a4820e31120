//! Bridging layer for Stowage
//!
//! Converts strongly-typed values to and from the shapes a key-value store
//! holds natively:
//!
//! - **Bridge**: a stateless pair of conversions, `T <-> StoreValue`
//! - **Storable**: a type's static choice of bridge
//! - **Derivations**: native identity, raw value (`RawRepresentable`),
//!   generic encoding (serde), manual
//! - **Codec**: the serde-backed encode/decode service behind encoded bridges
//!
//! Conversions never fail loudly. Anything that cannot be converted comes
//! out as `None` and is logged under the `stowage::bridge` target.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod builtin;
pub mod codec;
pub mod storable;

pub use bridge::Bridge;
pub use builtin::ByteBuffer;
pub use codec::{decode, encode, Encoding};
pub use storable::{NativeValue, RawRepresentable, Storable};
