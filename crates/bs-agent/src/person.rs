//! `PersonAgent` — a rider cycling between sites.
//!
//! ```text
//! AtSite(i) ──get_bike(preferred)──▶ Riding ──put_bike──▶ Walking ──▶ AtSite(k) ─┐
//!     ▲                                                                        │
//!     └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop ends when a stop is requested or a station reports shutdown.

use bs_core::{AgentId, AgentRng, Bike, BikeType, SiteId};
use bs_station::StationClosed;
use tracing::{debug, trace};

use crate::{AgentContext, StopFlag};

/// Counters returned by [`PersonAgent::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PersonStats {
    /// Completed borrow → ride → deposit trips.
    pub trips: u64,
}

/// A person who always rides the same bike type.
pub struct PersonAgent {
    id:        AgentId,
    preferred: BikeType,
    site:      SiteId,
    ctx:       AgentContext,
    rng:       AgentRng,
}

impl PersonAgent {
    pub fn new(
        id:        AgentId,
        preferred: BikeType,
        start:     SiteId,
        ctx:       AgentContext,
        rng:       AgentRng,
    ) -> Self {
        Self { id, preferred, site: start, ctx, rng }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn preferred(&self) -> BikeType {
        self.preferred
    }

    /// The site the person is currently at (or last arrived at).
    #[inline]
    pub fn site(&self) -> SiteId {
        self.site
    }

    /// Repeat trips until `stop` is requested or a station shuts down.
    ///
    /// `stop` is checked before borrowing and after docking; a bike already
    /// borrowed is always ridden and docked first.
    pub fn run(&mut self, stop: &StopFlag) -> PersonStats {
        self.log(&format!("person {} prefers {}", self.id.0, self.preferred));
        let mut stats = PersonStats::default();
        while !stop.is_requested() {
            if self.trip().is_err() {
                debug!(agent = %self.id, site = %self.site, "station closed, person leaving");
                break;
            }
            stats.trips += 1;
            if stop.is_requested() {
                break;
            }
            self.walk_on();
        }
        debug!(agent = %self.id, trips = stats.trips, "person stopped");
        stats
    }

    /// Borrow a bike of the preferred type here, ride it to another site and
    /// dock it there.  Returns the site the person arrived at.
    ///
    /// # Errors
    ///
    /// [`StationClosed`] if either station is shutting down.  If the drop-off
    /// station closes, the bike is not delivered; that only happens while the
    /// simulation is being torn down.
    pub fn trip(&mut self) -> Result<SiteId, StationClosed> {
        let destination = self.rng.other_site(self.ctx.sites(), self.site);
        let bike = self.take_bike()?;
        self.ride_to(destination, &bike);
        self.deposit(bike)?;
        Ok(self.site)
    }

    /// Walk from the current site to another one.  Returns the new site.
    pub fn walk_on(&mut self) -> SiteId {
        let to = self.rng.other_site(self.ctx.sites(), self.site);
        let t = self.ctx.timing;
        let ms = self.rng.travel_ms(t.min_walk_ms, t.jitter_ms);
        self.ctx.sink.on_walk(self.id, self.site, to, ms);
        self.ctx.pause(ms);
        self.site = to;
        to
    }

    // ── Trip stages ───────────────────────────────────────────────────────

    fn take_bike(&self) -> Result<Bike, StationClosed> {
        let station = &self.ctx.stations[self.site];
        let bike = station.get_bike(self.preferred)?;
        trace!(agent = %self.id, site = %self.site, bike = %bike, "bike borrowed");
        self.ctx.sink.on_occupancy_changed(self.site, station.total_bikes());
        Ok(bike)
    }

    fn ride_to(&mut self, to: SiteId, bike: &Bike) {
        let t = self.ctx.timing;
        let ms = self.rng.travel_ms(t.min_ride_ms, t.jitter_ms);
        trace!(agent = %self.id, from = %self.site, to = %to, bike = %bike, ms, "riding");
        self.ctx.sink.on_travel(self.id, self.site, to, ms);
        self.ctx.pause(ms);
        self.site = to;
    }

    fn deposit(&self, bike: Bike) -> Result<(), StationClosed> {
        let station = &self.ctx.stations[self.site];
        if let Err(refused) = station.put_bike(bike) {
            debug!(agent = %self.id, site = %self.site, "{refused}");
            self.log(&format!("site {} closed, {} left undelivered", self.site.0, refused.0));
            return Err(StationClosed);
        }
        self.ctx.sink.on_occupancy_changed(self.site, station.total_bikes());
        Ok(())
    }

    fn log(&self, message: &str) {
        self.ctx.sink.on_log(self.id, message);
    }
}
