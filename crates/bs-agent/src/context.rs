//! `AgentContext` — what every agent shares with every other.

use std::sync::Arc;
use std::thread;

use bs_core::Timing;
use bs_station::StationRegistry;

use crate::NotificationSink;

/// Read-only state handed to each agent at construction.
///
/// Cloning is cheap (two `Arc` bumps and a small `Timing` copy) and every
/// clone refers to the same stations and sink.
#[derive(Clone)]
pub struct AgentContext {
    /// The site → station table.  Never mutated after agents start.
    pub stations: Arc<StationRegistry>,
    pub sink:     Arc<dyn NotificationSink>,
    pub timing:   Timing,
}

impl AgentContext {
    pub fn new(
        stations: Arc<StationRegistry>,
        sink:     Arc<dyn NotificationSink>,
        timing:   Timing,
    ) -> Self {
        Self { stations, sink, timing }
    }

    /// Number of sites agents may travel between.
    #[inline]
    pub fn sites(&self) -> usize {
        self.stations.len()
    }

    /// Sleep for the wall-clock equivalent of a simulated `ms`.
    pub(crate) fn pause(&self, ms: u64) {
        let wall = self.timing.wall_clock(ms);
        if !wall.is_zero() {
            thread::sleep(wall);
        }
    }
}
