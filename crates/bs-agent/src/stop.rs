//! Cooperative cancellation for agent loops.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shared, one-way "please stop" flag.
///
/// Agents check it only at loop boundaries: a person at the start of every
/// iteration and after each deposit, the van at the start of every cycle and
/// before each site.  A person who wakes from `get_bike` holding a bike
/// finishes the ride and docks it before looking at the flag, so no bike is
/// abandoned mid-trip.  Requesting a stop does not by itself unblock an agent
/// waiting inside a station; shut the stations down for that.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this flag to stop.  Idempotent.
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
