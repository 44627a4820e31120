//! Store value model
//!
//! `StoreValue` is the closed set of shapes the preference store accepts
//! natively. Everything a caller stores is bridged into one of these.
//!
//! ## Type Rules
//!
//! - Nine shapes only: Bool, Int, Float, Double, String, Bytes, Timestamp,
//!   Array, Map
//! - No implicit coercions: `Int(1) != Double(1.0)`, `Float(1.0) != Double(1.0)`
//! - `Bytes` are not `String`
//! - Floats use IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//!
//! There is no null shape. Absence is `Option::None` at every API boundary,
//! and a store never holds a null sentinel.

use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A value in the store's native shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreValue {
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Point in time
    Timestamp(Timestamp),
    /// Ordered sequence of values
    Array(Vec<StoreValue>),
    /// String-keyed mapping of values
    Map(HashMap<String, StoreValue>),
}

// Custom PartialEq implementation for IEEE-754 float semantics
impl PartialEq for StoreValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StoreValue::Bool(a), StoreValue::Bool(b)) => a == b,
            (StoreValue::Int(a), StoreValue::Int(b)) => a == b,
            (StoreValue::Float(a), StoreValue::Float(b)) => a == b,
            (StoreValue::Double(a), StoreValue::Double(b)) => a == b,
            (StoreValue::String(a), StoreValue::String(b)) => a == b,
            (StoreValue::Bytes(a), StoreValue::Bytes(b)) => a == b,
            (StoreValue::Timestamp(a), StoreValue::Timestamp(b)) => a == b,
            (StoreValue::Array(a), StoreValue::Array(b)) => a == b,
            (StoreValue::Map(a), StoreValue::Map(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            // Different shapes are never equal
            _ => false,
        }
    }
}

impl StoreValue {
    /// Shape name, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            StoreValue::Bool(_) => "Bool",
            StoreValue::Int(_) => "Int",
            StoreValue::Float(_) => "Float",
            StoreValue::Double(_) => "Double",
            StoreValue::String(_) => "String",
            StoreValue::Bytes(_) => "Bytes",
            StoreValue::Timestamp(_) => "Timestamp",
            StoreValue::Array(_) => "Array",
            StoreValue::Map(_) => "Map",
        }
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoreValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            StoreValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f32 if this is a Float value
    pub fn as_float(&self) -> Option<f32> {
        match self {
            StoreValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as f64 if this is a Double value
    pub fn as_double(&self) -> Option<f64> {
        match self {
            StoreValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoreValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[u8] if this is a Bytes value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            StoreValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the timestamp if this is a Timestamp value
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            StoreValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Get as &[StoreValue] if this is an Array value
    pub fn as_array(&self) -> Option<&[StoreValue]> {
        match self {
            StoreValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as &HashMap if this is a Map value
    pub fn as_map(&self) -> Option<&HashMap<String, StoreValue>> {
        match self {
            StoreValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Number of elements for collection shapes
    pub fn len(&self) -> Option<usize> {
        match self {
            StoreValue::Array(a) => Some(a.len()),
            StoreValue::Map(m) => Some(m.len()),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for StoreValue {
    fn from(s: &str) -> Self {
        StoreValue::String(s.to_string())
    }
}

impl From<String> for StoreValue {
    fn from(s: String) -> Self {
        StoreValue::String(s)
    }
}

impl From<bool> for StoreValue {
    fn from(b: bool) -> Self {
        StoreValue::Bool(b)
    }
}

impl From<i64> for StoreValue {
    fn from(i: i64) -> Self {
        StoreValue::Int(i)
    }
}

impl From<i32> for StoreValue {
    fn from(i: i32) -> Self {
        StoreValue::Int(i as i64)
    }
}

impl From<f32> for StoreValue {
    fn from(f: f32) -> Self {
        StoreValue::Float(f)
    }
}

impl From<f64> for StoreValue {
    fn from(d: f64) -> Self {
        StoreValue::Double(d)
    }
}

impl From<Vec<u8>> for StoreValue {
    fn from(b: Vec<u8>) -> Self {
        StoreValue::Bytes(b)
    }
}

impl From<Timestamp> for StoreValue {
    fn from(t: Timestamp) -> Self {
        StoreValue::Timestamp(t)
    }
}

impl From<Vec<StoreValue>> for StoreValue {
    fn from(a: Vec<StoreValue>) -> Self {
        StoreValue::Array(a)
    }
}

impl From<HashMap<String, StoreValue>> for StoreValue {
    fn from(m: HashMap<String, StoreValue>) -> Self {
        StoreValue::Map(m)
    }
}
