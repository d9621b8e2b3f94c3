//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` so tests
//! and front ends can build them literally, but callers indexing a `Vec`
//! should prefer the `.index()` helper.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identifier of a person or van agent.  The van is conventionally
    /// `AgentId(0)`; persons are numbered from 1.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a docking site in the station registry.  Site 0 is the depot
    /// by convention (see [`SiteId::DEPOT`]).
    pub struct SiteId(u32);
}

typed_id! {
    /// Bike category.  Valid values are `0..bike_types` for the configured
    /// fleet; `u8` keeps the set deliberately small.
    pub struct BikeType(u8);
}

typed_id! {
    /// Serial number of a bike, assigned by [`BikeFleet`][crate::BikeFleet].
    /// Diagnostic only; stations never reason about individual bikes.
    pub struct BikeId(u32);
}

impl SiteId {
    /// The conventional depot site.
    pub const DEPOT: SiteId = SiteId(0);
}

impl BikeType {
    /// Iterate every bike type of a fleet with `count` types, in index order.
    pub fn all(count: usize) -> impl Iterator<Item = BikeType> {
        (0..count.min(u8::MAX as usize)).map(|t| BikeType(t as u8))
    }
}
