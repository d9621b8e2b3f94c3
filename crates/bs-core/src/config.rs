//! Simulation configuration.
//!
//! # Design
//!
//! Every constant the agents and stations need is fixed at construction time
//! and carried in one `BikingConfig`.  Applications build it in code or load
//! it from JSON (with the `serde` feature); [`BikingConfig::validate`] is run
//! by the simulation builder before anything is allocated.
//!
//! Durations are simulated milliseconds.  [`Timing::time_scale`] maps them to
//! wall-clock sleeps: `1.0` sleeps the full duration, `0.0` never sleeps (the
//! agents then spin as fast as the stations let them, which is what tests
//! want).

use std::time::Duration;

use crate::{BsError, BsResult, SiteId};

/// Docking points kept free below capacity when the van rebalances a site.
pub const REBALANCE_HEADROOM: usize = 2;

/// Upper bound accepted for any base or jitter duration: one simulated day.
pub const MAX_TRIP_MS: u64 = 86_400_000;

/// Upper bound accepted for [`Timing::time_scale`].
pub const MAX_TIME_SCALE: f64 = 1_000.0;

// ── Timing ────────────────────────────────────────────────────────────────────

/// Travel duration parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Timing {
    /// Fixed base added to every bike ride.
    pub min_ride_ms: u64,
    /// Fixed base added to every walk.  Walks are slower than rides.
    pub min_walk_ms: u64,
    /// Upper bound of the uniform random part of every trip (rides, walks,
    /// and van drives).
    pub jitter_ms: u64,
    /// Wall-clock seconds slept per simulated second.
    pub time_scale: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            min_ride_ms: 1_000,
            min_walk_ms: 2_000,
            jitter_ms:   2_000,
            time_scale:  1.0,
        }
    }
}

impl Timing {
    /// Timing for tests: default durations, no sleeping.
    pub fn instant() -> Self {
        Self { time_scale: 0.0, ..Self::default() }
    }

    /// Wall-clock time to sleep for a simulated duration of `ms`.
    ///
    /// Returns `Duration::ZERO` when the scale is zero (or invalid), and
    /// saturates at `Duration::MAX` instead of overflowing.
    pub fn wall_clock(&self, ms: u64) -> Duration {
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(ms as f64 * self.time_scale / 1_000.0).unwrap_or(Duration::MAX)
    }
}

// ── BikingConfig ──────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BikingConfig {
    /// Total number of sites, depot included.
    pub sites: usize,

    /// Index of the depot.  Conventionally site 0.
    pub depot: SiteId,

    /// Docking points per ordinary site.
    pub bornes: usize,

    /// Docking points at the depot.
    pub depot_capacity: usize,

    /// Maximum bikes the van carries at once.
    pub van_capacity: usize,

    /// Number of bike categories.
    pub bike_types: usize,

    /// Number of person agents.
    pub persons: usize,

    /// Bikes placed at each ordinary site before the agents start.
    pub bikes_per_site: usize,

    /// Bikes placed at the depot before the agents start.
    pub depot_bikes: usize,

    pub timing: Timing,

    /// Master RNG seed.
    pub seed: u64,
}

impl Default for BikingConfig {
    fn default() -> Self {
        Self {
            sites:          6,
            depot:          SiteId::DEPOT,
            bornes:         6,
            depot_capacity: 6,
            van_capacity:   4,
            bike_types:     3,
            persons:        12,
            bikes_per_site: 4,
            depot_bikes:    4,
            timing:         Timing::default(),
            seed:           42,
        }
    }
}

impl BikingConfig {
    /// Capacity of the station at `site`.
    #[inline]
    pub fn capacity_of(&self, site: SiteId) -> usize {
        if site == self.depot { self.depot_capacity } else { self.bornes }
    }

    /// Bikes initially placed at `site`.
    #[inline]
    pub fn initial_stock_of(&self, site: SiteId) -> usize {
        if site == self.depot { self.depot_bikes } else { self.bikes_per_site }
    }

    /// Target occupancy the van restores a station of `capacity` to.
    #[inline]
    pub fn threshold_for(capacity: usize) -> usize {
        capacity.saturating_sub(REBALANCE_HEADROOM)
    }

    /// Iterate every site index in order, depot included.
    pub fn site_ids(&self) -> impl Iterator<Item = SiteId> {
        (0..self.sites as u32).map(SiteId)
    }

    /// Check the configuration for values the simulation cannot run with.
    pub fn validate(&self) -> BsResult<()> {
        let fail = |msg: String| -> BsResult<()> { Err(BsError::Config(msg)) };

        if self.sites < 2 {
            return fail(format!("need at least 2 sites, got {}", self.sites));
        }
        if self.sites > u32::MAX as usize {
            return fail(format!("too many sites: {}", self.sites));
        }
        // Persons are numbered 1..=persons and must stay below AgentId::INVALID.
        if self.persons >= u32::MAX as usize {
            return fail(format!("too many persons: {}", self.persons));
        }
        if self.depot.index() >= self.sites {
            return fail(format!("depot {} is not one of the {} sites", self.depot, self.sites));
        }
        if self.bornes < REBALANCE_HEADROOM || self.depot_capacity < REBALANCE_HEADROOM {
            return fail(format!(
                "station capacities must be at least {REBALANCE_HEADROOM} \
                 (bornes={}, depot_capacity={})",
                self.bornes, self.depot_capacity
            ));
        }
        if self.van_capacity == 0 {
            return fail("van capacity must be positive".into());
        }
        if self.bike_types == 0 || self.bike_types >= u8::MAX as usize {
            return fail(format!("bike_types must be in 1..{}, got {}", u8::MAX, self.bike_types));
        }
        if self.bikes_per_site > self.bornes {
            return fail(format!(
                "bikes_per_site ({}) exceeds bornes ({})",
                self.bikes_per_site, self.bornes
            ));
        }
        if self.depot_bikes > self.depot_capacity {
            return fail(format!(
                "depot_bikes ({}) exceeds depot_capacity ({})",
                self.depot_bikes, self.depot_capacity
            ));
        }
        let t = &self.timing;
        if !(t.time_scale.is_finite() && (0.0..=MAX_TIME_SCALE).contains(&t.time_scale)) {
            return fail(format!("time_scale must be in 0..={MAX_TIME_SCALE}, got {}", t.time_scale));
        }
        for (name, ms) in [
            ("min_ride_ms", t.min_ride_ms),
            ("min_walk_ms", t.min_walk_ms),
            ("jitter_ms", t.jitter_ms),
        ] {
            if ms > MAX_TRIP_MS {
                return fail(format!("{name} must be at most {MAX_TRIP_MS}, got {ms}"));
            }
        }
        Ok(())
    }
}
