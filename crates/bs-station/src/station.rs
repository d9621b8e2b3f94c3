//! `BikeStation` — a bounded, typed multi-queue with a shutdown protocol.
//!
//! # Wake conditions
//!
//! Two independent condition families guard the station:
//!
//! - `bike_added[t]`, one per bike type — signalled when a bike of type `t`
//!   is docked.  Only [`get_bike`][BikeStation::get_bike] callers asking for
//!   `t` wait here, so an arrival of type B never wakes a thread that wants
//!   type A.
//! - `slot_freed`, shared by all types — broadcast on every removal.  Any
//!   removal frees a docking point usable by a bike of *any* type, so every
//!   waiting [`put_bike`][BikeStation::put_bike] caller must get a chance to
//!   re-check; signalling only same-type inserters would let removals of
//!   type B starve an inserter of type A forever.
//!
//! Shutdown broadcasts on both families.  The flag is set under the lock
//! before the broadcast, so a waiter either sees it before sleeping or is
//! woken by the broadcast; no wakeup is lost.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use bs_core::{Bike, BikeType, SiteId};
use tracing::{debug, trace};

use crate::{DockRefused, StationClosed};

// ── Docks ─────────────────────────────────────────────────────────────────────

/// Lock-protected station state.
struct Docks {
    /// FIFO queue per bike type, indexed by `BikeType`.  A bike is only ever
    /// pushed onto the queue of its own kind.
    by_type: Vec<VecDeque<Bike>>,
    /// Set at most once, never cleared.
    shutting_down: bool,
}

impl Docks {
    #[inline]
    fn total(&self) -> usize {
        self.by_type.iter().map(VecDeque::len).sum()
    }
}

// ── BikeStation ───────────────────────────────────────────────────────────────

/// The bike store of one site.
///
/// Invariant, at every point the lock is released:
/// `sum(len(by_type[t])) <= capacity`.  Every capacity check happens under
/// the same lock acquisition as the mutation it guards.
pub struct BikeStation {
    site:       SiteId,
    capacity:   usize,
    docks:      Mutex<Docks>,
    bike_added: Vec<Condvar>,
    slot_freed: Condvar,
}

impl BikeStation {
    /// An empty station for `site` with `capacity` docking points, accepting
    /// bikes of types `0..bike_types`.
    pub fn new(site: SiteId, capacity: usize, bike_types: usize) -> Self {
        Self {
            site,
            capacity,
            docks: Mutex::new(Docks {
                by_type:       (0..bike_types).map(|_| VecDeque::new()).collect(),
                shutting_down: false,
            }),
            bike_added: (0..bike_types).map(|_| Condvar::new()).collect(),
            slot_freed: Condvar::new(),
        }
    }

    /// The site this station serves.
    #[inline]
    pub fn site(&self) -> SiteId {
        self.site
    }

    /// Number of bike types this station keeps queues for.
    #[inline]
    pub fn bike_types(&self) -> usize {
        self.bike_added.len()
    }

    // ── Blocking operations ───────────────────────────────────────────────

    /// Dock `bike`, waiting while the station is full.
    ///
    /// # Errors
    ///
    /// [`DockRefused`] (carrying `bike` back) if the station is shutting down,
    /// whether that was already the case on entry or happened while waiting.
    ///
    /// # Panics
    ///
    /// If the bike's kind is not one of this station's types.
    pub fn put_bike(&self, bike: Bike) -> Result<(), DockRefused> {
        let kind = self.checked_kind(bike.kind());
        let mut docks = self.lock();
        loop {
            if docks.shutting_down {
                return Err(DockRefused(bike));
            }
            if docks.total() < self.capacity {
                docks.by_type[kind].push_back(bike);
                self.bike_added[kind].notify_one();
                return Ok(());
            }
            docks = self.slot_freed.wait(docks).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Take the oldest bike of `kind`, waiting while there is none.
    ///
    /// # Errors
    ///
    /// [`StationClosed`] if the station is shutting down.
    ///
    /// # Panics
    ///
    /// If `kind` is not one of this station's types.
    pub fn get_bike(&self, kind: BikeType) -> Result<Bike, StationClosed> {
        let k = self.checked_kind(kind);
        let mut docks = self.lock();
        loop {
            if docks.shutting_down {
                return Err(StationClosed);
            }
            if let Some(bike) = docks.by_type[k].pop_front() {
                self.slot_freed.notify_all();
                return Ok(bike);
            }
            docks = self.bike_added[k].wait(docks).unwrap_or_else(PoisonError::into_inner);
        }
    }

    // ── Best-effort batch operations ──────────────────────────────────────

    /// Dock as many of `bikes` as fit, in input order, without blocking.
    ///
    /// Returns the bikes that did not fit, in their original relative order.
    /// Once the station is full every remaining bike is rejected, so the
    /// result is always a suffix of the input.
    pub fn add_bikes(&self, bikes: Vec<Bike>) -> Vec<Bike> {
        for bike in &bikes {
            self.checked_kind(bike.kind());
        }
        let offered = bikes.len();
        let mut rejected = Vec::new();
        {
            let mut docks = self.lock();
            let mut free = self.capacity.saturating_sub(docks.total());
            for bike in bikes {
                if free == 0 {
                    rejected.push(bike);
                    continue;
                }
                let kind = bike.kind().index();
                docks.by_type[kind].push_back(bike);
                self.bike_added[kind].notify_one();
                free -= 1;
            }
        }
        trace!(
            site = %self.site,
            accepted = offered - rejected.len(),
            rejected = rejected.len(),
            "batch docked"
        );
        rejected
    }

    /// Withdraw up to `count` bikes without blocking.
    ///
    /// Types are drained in index order, each queue oldest-first, so the
    /// result holds every taken bike of type 0, then type 1, and so on.
    /// Fewer than `count` bikes (possibly none) is a valid result.
    pub fn get_bikes(&self, count: usize) -> Vec<Bike> {
        let mut taken = Vec::with_capacity(count.min(self.capacity));
        {
            let mut docks = self.lock();
            for queue in docks.by_type.iter_mut() {
                if taken.len() == count {
                    break;
                }
                let n = (count - taken.len()).min(queue.len());
                taken.extend(queue.drain(..n));
            }
            if !taken.is_empty() {
                self.slot_freed.notify_all();
            }
        }
        trace!(site = %self.site, requested = count, taken = taken.len(), "batch withdrawn");
        taken
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Bikes of `kind` currently docked.  Informational only: the answer may
    /// be stale as soon as the lock is released.
    pub fn count_bikes_of_type(&self, kind: BikeType) -> usize {
        self.lock().by_type.get(kind.index()).map_or(0, VecDeque::len)
    }

    /// Per-type docked counts, indexed by `BikeType`.
    pub fn counts_by_type(&self) -> Vec<usize> {
        self.lock().by_type.iter().map(VecDeque::len).collect()
    }

    /// Total bikes currently docked.
    pub fn total_bikes(&self) -> usize {
        self.lock().total()
    }

    /// Number of docking points.  Fixed at construction.
    #[inline]
    pub fn capacity_slots(&self) -> usize {
        self.capacity
    }

    /// `true` once [`shutdown`][Self::shutdown] has been called.
    pub fn is_shutting_down(&self) -> bool {
        self.lock().shutting_down
    }

    // ── Shutdown ──────────────────────────────────────────────────────────

    /// Release every thread blocked in `put_bike`/`get_bike` and make all
    /// future blocking calls return their shutdown outcome.
    ///
    /// Idempotent and irreversible.  Bikes already docked stay docked and
    /// remain reachable through the non-blocking calls.
    pub fn shutdown(&self) {
        {
            let mut docks = self.lock();
            if docks.shutting_down {
                return;
            }
            docks.shutting_down = true;
            self.slot_freed.notify_all();
            for cv in &self.bike_added {
                cv.notify_all();
            }
        }
        debug!(site = %self.site, "station shut down");
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Lock the docks.  A panic while holding the lock cannot leave the
    /// queues half-updated (every mutation is a single push, pop, or drain),
    /// so a poisoned lock is safe to keep using.
    fn lock(&self) -> MutexGuard<'_, Docks> {
        self.docks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn checked_kind(&self, kind: BikeType) -> usize {
        let k = kind.index();
        assert!(
            k < self.bike_added.len(),
            "{kind} is not handled by the station at {} ({} types)",
            self.site,
            self.bike_added.len()
        );
        k
    }
}

impl std::fmt::Debug for BikeStation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BikeStation")
            .field("site", &self.site)
            .field("capacity", &self.capacity)
            .field("bikes", &self.total_bikes())
            .finish()
    }
}
