//! `SimReport` — what a finished run leaves behind.

use std::time::Duration;

use bs_agent::{PersonStats, VanStats};
use bs_core::AgentId;

/// Summary returned by [`RunningSim::stop`][crate::RunningSim::stop].
#[derive(Clone, Debug)]
pub struct SimReport {
    /// Wall-clock time between `start` and `stop`.
    pub elapsed: Duration,

    /// Per-person counters, in ascending `AgentId` order.
    pub persons: Vec<(AgentId, PersonStats)>,

    pub van: VanStats,

    /// Bikes still in the van when it stopped.
    pub van_cargo: usize,

    /// Bikes docked at each site after shutdown, in site order.
    pub occupancy: Vec<usize>,

    /// Bikes docked per site and type after shutdown.
    pub counts_by_type: Vec<Vec<usize>>,

    /// Bikes minted when the stations were stocked.
    pub fleet_size: usize,
}

impl SimReport {
    /// Completed person trips across all persons.
    pub fn total_trips(&self) -> u64 {
        self.persons.iter().map(|(_, s)| s.trips).sum()
    }

    /// Bikes docked across all sites.
    pub fn docked(&self) -> usize {
        self.occupancy.iter().sum()
    }

    /// Bikes neither docked nor in the van: those riders were carrying when
    /// their drop-off station shut down.  At most one per person.
    pub fn undelivered(&self) -> usize {
        self.fleet_size.saturating_sub(self.docked() + self.van_cargo)
    }
}
