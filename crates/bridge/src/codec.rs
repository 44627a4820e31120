//! Generic encode/decode service
//!
//! Structured types that have no native store shape are stored as bytes.
//! The bytes come from serde in one of three formats; JSON is the default
//! because it stays readable when a snapshot is inspected by hand.

use serde::de::DeserializeOwned;
use serde::Serialize;
use stowage_core::{Error, Result};

/// Byte format for encoded values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// UTF-8 JSON (`serde_json`)
    #[default]
    Json,
    /// MessagePack with named fields (`rmp-serde`)
    MessagePack,
    /// Compact positional binary (`bincode`)
    Bincode,
}

impl Encoding {
    /// Short name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::MessagePack => "msgpack",
            Encoding::Bincode => "bincode",
        }
    }
}

/// Encode `value` into bytes
///
/// # Errors
///
/// Returns `Error::Encode` if serde rejects the value (for example a map
/// with non-string keys under JSON).
pub fn encode<T: Serialize + ?Sized>(value: &T, encoding: Encoding) -> Result<Vec<u8>> {
    match encoding {
        Encoding::Json => serde_json::to_vec(value).map_err(Error::encode),
        Encoding::MessagePack => rmp_serde::to_vec_named(value).map_err(Error::encode),
        Encoding::Bincode => bincode::serialize(value).map_err(Error::encode),
    }
}

/// Decode bytes produced by [`encode`] with the same encoding
///
/// # Errors
///
/// Returns `Error::Decode` if the bytes are malformed or describe a
/// different type.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], encoding: Encoding) -> Result<T> {
    match encoding {
        Encoding::Json => serde_json::from_slice(bytes).map_err(Error::decode),
        Encoding::MessagePack => rmp_serde::from_slice(bytes).map_err(Error::decode),
        Encoding::Bincode => Ok(bincode::deserialize(bytes)?),
    }
}
