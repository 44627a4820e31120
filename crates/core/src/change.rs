//! Change notification payloads
//!
//! A store reports every mutation of a key to the observers registered for
//! it as a [`RawChange`]. The payload is untyped: old and new values are
//! raw [`StoreValue`]s, and which fields are populated depends on the
//! [`ObservingOptions`] the observer registered with.

use crate::value::StoreValue;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// What kind of mutation a notification describes
///
/// Plain writes are always `Setting`. The collection kinds exist for stores
/// that report element-level mutation of array-valued keys, in which case
/// [`RawChange::indices`] names the affected slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChangeKind {
    /// The value was replaced wholesale (or removed)
    #[default]
    Setting,
    /// Elements were inserted into an array value
    Insertion,
    /// Elements were removed from an array value
    Removal,
    /// Elements of an array value were replaced
    Replacement,
}

/// Which fields a notification carries, and when it fires
///
/// Combine flags with `|`:
///
/// ```
/// use stowage_core::ObservingOptions;
///
/// let options = ObservingOptions::OLD | ObservingOptions::NEW;
/// assert!(options.contains(ObservingOptions::OLD));
/// assert!(!options.contains(ObservingOptions::PRIOR));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObservingOptions(u8);

impl ObservingOptions {
    /// Include the value after the change
    pub const NEW: ObservingOptions = ObservingOptions(0b0001);
    /// Include the value before the change
    pub const OLD: ObservingOptions = ObservingOptions(0b0010);
    /// Send one notification with the current value on registration
    pub const INITIAL: ObservingOptions = ObservingOptions(0b0100);
    /// Send an extra notification before each change is applied
    pub const PRIOR: ObservingOptions = ObservingOptions(0b1000);

    /// No flags
    pub const fn empty() -> Self {
        ObservingOptions(0)
    }

    /// Whether every flag of `other` is set
    pub const fn contains(self, other: ObservingOptions) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no flag is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ObservingOptions {
    type Output = ObservingOptions;

    fn bitor(self, rhs: Self) -> Self::Output {
        ObservingOptions(self.0 | rhs.0)
    }
}

impl BitOrAssign for ObservingOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ObservingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::NEW, "NEW"),
            (Self::OLD, "OLD"),
            (Self::INITIAL, "INITIAL"),
            (Self::PRIOR, "PRIOR"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "ObservingOptions({})", set.join(" | "))
    }
}

/// Untyped change payload delivered by a store
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawChange {
    /// Kind of mutation
    pub kind: ChangeKind,
    /// Affected slots for element-level mutation of array values
    pub indices: Option<BTreeSet<usize>>,
    /// True for the notification sent before the change is applied
    pub is_prior: bool,
    /// Value before the change, when requested and present
    pub old: Option<StoreValue>,
    /// Value after the change, when requested and present
    pub new: Option<StoreValue>,
}

impl RawChange {
    /// Build a `Setting` payload, keeping only the fields `options` asks for
    pub fn setting(
        options: ObservingOptions,
        old: Option<StoreValue>,
        new: Option<StoreValue>,
    ) -> Self {
        RawChange {
            kind: ChangeKind::Setting,
            indices: None,
            is_prior: false,
            old: old.filter(|_| options.contains(ObservingOptions::OLD)),
            new: new.filter(|_| options.contains(ObservingOptions::NEW)),
        }
    }

    /// Build the prior notification for a pending write
    ///
    /// Prior notifications never carry the new value.
    pub fn prior(options: ObservingOptions, old: Option<StoreValue>) -> Self {
        RawChange {
            is_prior: true,
            ..RawChange::setting(options, old, None)
        }
    }
}
