//! Core types for Stowage
//!
//! This crate defines the foundational types used throughout the system:
//! - StoreValue: the closed set of shapes a preference store holds natively
//! - Timestamp: the store's date shape
//! - RawChange, ChangeKind, ObservingOptions: untyped change notifications
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod change;
pub mod error;
pub mod timestamp;
pub mod value;

pub use change::{ChangeKind, ObservingOptions, RawChange};
pub use error::{Error, Result};
pub use timestamp::Timestamp;
pub use value::StoreValue;
