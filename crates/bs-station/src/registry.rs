//! `StationRegistry` — the fixed site → station table shared by every agent.
//!
//! Built once before any agent starts and wrapped in an `Arc`.  The table
//! itself is never mutated afterwards, so reading it needs no lock; all
//! mutation happens inside the individual stations.

use std::ops::Index;

use bs_core::{Bike, BikeFleet, BikingConfig, BsError, BsResult, SimRng, SiteId};
use tracing::debug;

use crate::BikeStation;

/// One [`BikeStation`] per site, indexed by `SiteId`.
#[derive(Debug)]
pub struct StationRegistry {
    stations: Vec<BikeStation>,
    depot:    SiteId,
}

impl StationRegistry {
    /// Empty stations for every site in `config`.  `config` must already have
    /// passed [`BikingConfig::validate`].
    pub fn new(config: &BikingConfig) -> Self {
        let stations = config
            .site_ids()
            .map(|site| BikeStation::new(site, config.capacity_of(site), config.bike_types))
            .collect();
        Self { stations, depot: config.depot }
    }

    /// Stations for every site in `config`, each pre-stocked with its initial
    /// number of bikes of uniformly random kinds minted from `fleet`.
    pub fn stocked(config: &BikingConfig, fleet: &mut BikeFleet, rng: &mut SimRng) -> Self {
        let registry = Self::new(config);
        for station in &registry.stations {
            let stock: Vec<Bike> = (0..config.initial_stock_of(station.site()))
                .map(|_| fleet.mint_random(rng))
                .collect();
            let rejected = station.add_bikes(stock);
            debug_assert!(rejected.is_empty(), "initial stock exceeds capacity");
            debug!(site = %station.site(), bikes = station.total_bikes(), "station stocked");
        }
        registry
    }

    /// Build a registry from already-constructed stations.  Station `i` must
    /// serve `SiteId(i)`.
    pub fn from_stations(stations: Vec<BikeStation>, depot: SiteId) -> BsResult<Self> {
        if depot.index() >= stations.len() {
            return Err(BsError::SiteNotFound(depot));
        }
        if let Some(misplaced) = stations.iter().enumerate().find(|(i, s)| s.site().index() != *i) {
            return Err(BsError::Config(format!(
                "station for {} stored at index {}",
                misplaced.1.site(),
                misplaced.0
            )));
        }
        Ok(Self { stations, depot })
    }

    /// The station at `site`, or `None` if `site` is out of range.
    #[inline]
    pub fn get(&self, site: SiteId) -> Option<&BikeStation> {
        self.stations.get(site.index())
    }

    /// The station at `site`.
    ///
    /// # Errors
    ///
    /// [`BsError::SiteNotFound`] if `site` is out of range.
    pub fn station(&self, site: SiteId) -> BsResult<&BikeStation> {
        self.get(site).ok_or(BsError::SiteNotFound(site))
    }

    /// The depot's station.
    #[inline]
    pub fn depot(&self) -> &BikeStation {
        &self.stations[self.depot.index()]
    }

    #[inline]
    pub fn depot_id(&self) -> SiteId {
        self.depot
    }

    /// Number of sites, depot included.
    #[inline]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// All stations in site order.
    pub fn iter(&self) -> impl Iterator<Item = &BikeStation> {
        self.stations.iter()
    }

    /// Bikes docked across all stations.
    pub fn total_bikes(&self) -> usize {
        self.stations.iter().map(BikeStation::total_bikes).sum()
    }

    /// Per-site docked totals, in site order.
    pub fn occupancy(&self) -> Vec<usize> {
        self.stations.iter().map(BikeStation::total_bikes).collect()
    }

    /// Shut down every station.  Idempotent.
    pub fn shutdown_all(&self) {
        for station in &self.stations {
            station.shutdown();
        }
    }
}

impl Index<SiteId> for StationRegistry {
    type Output = BikeStation;

    /// # Panics
    ///
    /// If `site` is out of range.  Agents only ever hold sites drawn from
    /// `0..len()`, so use [`StationRegistry::station`] for untrusted input.
    #[inline]
    fn index(&self, site: SiteId) -> &BikeStation {
        &self.stations[site.index()]
    }
}
