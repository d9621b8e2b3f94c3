//! The `Bike` value and the `BikeFleet` that mints them.
//!
//! `Bike` is move-only: it is neither `Clone` nor `Copy`.  A bike is owned by
//! exactly one place at a time (a station queue, a rider, or the van's cargo),
//! and the borrow checker enforces the hand-offs between them.

use std::fmt;

use crate::{BikeId, BikeType, BsError, BsResult, SimRng};

/// A single bike.  Immutable once minted.
#[derive(Debug, PartialEq, Eq)]
pub struct Bike {
    id:   BikeId,
    kind: BikeType,
}

impl Bike {
    /// Construct a bike directly.  Prefer [`BikeFleet::mint`], which
    /// guarantees `kind` is valid for the configured fleet.
    pub fn new(id: BikeId, kind: BikeType) -> Self {
        Self { id, kind }
    }

    #[inline]
    pub fn id(&self) -> BikeId {
        self.id
    }

    /// The bike's category; determines which station queue holds it.
    #[inline]
    pub fn kind(&self) -> BikeType {
        self.kind
    }
}

impl fmt::Display for Bike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bike #{} ({})", self.id.0, self.kind)
    }
}

// ── BikeFleet ─────────────────────────────────────────────────────────────────

/// Mints bikes with consecutive serial numbers and in-range kinds.
///
/// Used single-threaded while the simulation is being built; it is never
/// shared with agents.
#[derive(Debug)]
pub struct BikeFleet {
    kinds: usize,
    next:  u32,
}

impl BikeFleet {
    /// A fleet whose bikes are drawn from `kinds` categories.
    pub fn new(kinds: usize) -> Self {
        Self { kinds, next: 0 }
    }

    /// Number of bikes minted so far.
    pub fn minted(&self) -> usize {
        self.next as usize
    }

    /// Mint one bike of `kind`.
    ///
    /// # Errors
    ///
    /// [`BsError::BikeTypeOutOfRange`] if `kind` is not one of this fleet's
    /// categories.
    pub fn mint(&mut self, kind: BikeType) -> BsResult<Bike> {
        if kind.index() >= self.kinds {
            return Err(BsError::BikeTypeOutOfRange(kind, self.kinds));
        }
        let id = BikeId(self.next);
        self.next += 1;
        Ok(Bike::new(id, kind))
    }

    /// Mint one bike of a uniformly random kind.
    pub fn mint_random(&mut self, rng: &mut SimRng) -> Bike {
        let kind = BikeType(rng.gen_range(0..self.kinds.max(1)) as u8);
        let id = BikeId(self.next);
        self.next += 1;
        Bike::new(id, kind)
    }
}
