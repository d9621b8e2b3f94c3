//! `VanAgent` — the rebalancing van.
//!
//! # Cycle
//!
//! ```text
//! depot: top cargo up from the depot stock
//! for every site in index order (depot included):
//!     occupancy > target  → take the surplus (bounded by cargo room)
//!     occupancy < target  → drop off the deficit (bounded by cargo):
//!                             1. one bike of each type the site lacks
//!                             2. then any bikes, most recently loaded first
//! depot: unload; whatever does not fit stays in the van for next cycle
//! ```
//!
//! A site's target is its capacity minus [`bs_core::REBALANCE_HEADROOM`], leaving room
//! for riders arriving while the van is away.  Seeding missing types first
//! maximises the variety on offer, so a rider of any preferred type is more
//! likely to find a bike without waiting.

use std::mem;
use std::sync::Arc;

use bs_core::{AgentId, AgentRng, Bike, BikeType, BikingConfig, SiteId};
use bs_station::{BikeStation, StationClosed};
use tracing::{debug, trace};

use crate::{AgentContext, StopFlag};

/// Counters returned by [`VanAgent::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VanStats {
    /// Completed depot → tour → depot cycles.
    pub cycles: u64,
    /// Bikes taken from or dropped at ordinary sites during tours.
    pub bikes_moved: u64,
}

/// The single van.
pub struct VanAgent {
    id:       AgentId,
    site:     SiteId,
    cargo:    Vec<Bike>,
    capacity: usize,
    ctx:      AgentContext,
    rng:      AgentRng,
    stats:    VanStats,
}

impl VanAgent {
    /// A van parked, empty, at the depot.
    pub fn new(id: AgentId, capacity: usize, ctx: AgentContext, rng: AgentRng) -> Self {
        let site = ctx.stations.depot_id();
        Self {
            id,
            site,
            cargo: Vec::with_capacity(capacity),
            capacity,
            ctx,
            rng,
            stats: VanStats::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn site(&self) -> SiteId {
        self.site
    }

    /// Bikes currently carried, in loading order.
    #[inline]
    pub fn cargo(&self) -> &[Bike] {
        &self.cargo
    }

    /// Free cargo space.
    #[inline]
    pub fn headroom(&self) -> usize {
        self.capacity.saturating_sub(self.cargo.len())
    }

    /// Repeat rebalancing cycles until `stop` is requested or a station
    /// refuses a drop-off because it is shutting down.
    pub fn run(&mut self, stop: &StopFlag) -> VanStats {
        'cycles: while !stop.is_requested() {
            self.load_at_depot();
            for site in 0..self.ctx.sites() {
                if stop.is_requested() {
                    break 'cycles;
                }
                let site = SiteId(site as u32);
                self.drive_to(site);
                if self.balance_site(site).is_err() {
                    debug!(agent = %self.id, site = %site, "station closed, van stopping");
                    break 'cycles;
                }
            }
            self.return_to_depot();
            self.stats.cycles += 1;
        }
        self.log("van stopping");
        debug!(agent = %self.id, cycles = self.stats.cycles, cargo = self.cargo.len(), "van stopped");
        self.stats
    }

    /// Drive to the depot and top the cargo up with as many bikes as fit and
    /// the depot holds.  Bikes kept from an earlier cycle stay loaded.
    pub fn load_at_depot(&mut self) {
        let depot_id = self.ctx.stations.depot_id();
        self.drive_to(depot_id);

        let stations = Arc::clone(&self.ctx.stations);
        let depot = stations.depot();
        let to_load = self.headroom().min(depot.total_bikes());
        if to_load == 0 {
            return;
        }
        let loaded = depot.get_bikes(to_load);
        let count = loaded.len();
        self.cargo.extend(loaded);

        let remaining = depot.total_bikes();
        debug!(agent = %self.id, loaded = count, cargo = self.cargo.len(), depot = remaining, "van loaded");
        self.log(&format!("loaded {count} bikes ({remaining} left at the depot)"));
        self.ctx.sink.on_occupancy_changed(depot_id, remaining);
    }

    /// Bring `site` toward its target occupancy.
    ///
    /// # Errors
    ///
    /// [`StationClosed`] if the site shut down during a drop-off.  The bike
    /// that was refused is back in the cargo.
    pub fn balance_site(&mut self, site: SiteId) -> Result<(), StationClosed> {
        let stations = Arc::clone(&self.ctx.stations);
        let station = &stations[site];
        let current = station.total_bikes();
        let target = BikingConfig::threshold_for(station.capacity_slots());
        trace!(
            agent = %self.id,
            site = %site,
            current,
            target,
            cargo = self.cargo.len(),
            "van balancing"
        );

        if current > target {
            let surplus = (current - target).min(self.headroom());
            if surplus == 0 {
                return Ok(());
            }
            let taken = station.get_bikes(surplus);
            let count = taken.len();
            self.cargo.extend(taken);
            self.stats.bikes_moved += count as u64;
            self.log(&format!("took {count} bikes from site {}", site.0));
        } else if current < target && !self.cargo.is_empty() {
            let deficit = (target - current).min(self.cargo.len());
            let placed = self.drop_off(station, deficit)?;
            self.log(&format!("dropped {placed} bikes at site {}", site.0));
        } else {
            return Ok(());
        }

        self.ctx.sink.on_occupancy_changed(site, station.total_bikes());
        Ok(())
    }

    /// Drive to the depot and unload.  Bikes the depot has no room for stay
    /// in the van.
    pub fn return_to_depot(&mut self) {
        let depot_id = self.ctx.stations.depot_id();
        self.drive_to(depot_id);
        if self.cargo.is_empty() {
            return;
        }

        let carried = self.cargo.len();
        let depot = self.ctx.stations.depot();
        self.cargo = depot.add_bikes(mem::take(&mut self.cargo));
        let kept = self.cargo.len();
        let total = depot.total_bikes();
        debug!(agent = %self.id, unloaded = carried - kept, kept, depot = total, "van unloaded");
        self.log(&format!("unloaded {} bikes at the depot ({kept} kept)", carried - kept));
        self.ctx.sink.on_occupancy_changed(depot_id, total);
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Place up to `deficit` bikes at `station`: first one of each type it
    /// has none of, then whatever is on top of the cargo.  Returns the number
    /// placed.
    fn drop_off(&mut self, station: &BikeStation, deficit: usize) -> Result<usize, StationClosed> {
        let mut placed = 0;

        for kind in BikeType::all(station.bike_types()) {
            if placed == deficit {
                break;
            }
            if station.count_bikes_of_type(kind) > 0 {
                continue;
            }
            let Some(bike) = self.take_from_cargo(kind) else {
                continue;
            };
            trace!(agent = %self.id, site = %station.site(), kind = %kind, "van seeds missing type");
            self.dock(station, bike)?;
            placed += 1;
        }

        while placed < deficit {
            let Some(bike) = self.cargo.pop() else {
                break;
            };
            self.dock(station, bike)?;
            placed += 1;
        }
        Ok(placed)
    }

    fn dock(&mut self, station: &BikeStation, bike: Bike) -> Result<(), StationClosed> {
        match station.put_bike(bike) {
            Ok(()) => {
                self.stats.bikes_moved += 1;
                Ok(())
            }
            Err(refused) => {
                self.cargo.push(refused.into_bike());
                Err(StationClosed)
            }
        }
    }

    /// Remove the earliest-loaded bike of `kind` from the cargo.
    fn take_from_cargo(&mut self, kind: BikeType) -> Option<Bike> {
        let pos = self.cargo.iter().position(|b| b.kind() == kind)?;
        Some(self.cargo.remove(pos))
    }

    fn drive_to(&mut self, to: SiteId) {
        if self.site == to {
            return;
        }
        let ms = self.rng.travel_ms(0, self.ctx.timing.jitter_ms);
        trace!(agent = %self.id, from = %self.site, to = %to, cargo = self.cargo.len(), "van driving");
        self.ctx.sink.on_van_travel(self.site, to, ms);
        self.ctx.pause(ms);
        self.site = to;
    }

    fn log(&self, message: &str) {
        self.ctx.sink.on_log(self.id, message);
    }
}
