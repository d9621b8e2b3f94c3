//! `Simulation` and `RunningSim` — thread-per-agent lifecycle.

use std::mem;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bs_agent::{PersonAgent, PersonStats, StopFlag, VanAgent, VanStats};
use bs_core::{AgentId, BikingConfig};
use bs_station::{BikeStation, StationRegistry};
use tracing::{info, warn};

use crate::{SimError, SimReport, SimResult};

// ── Simulation ────────────────────────────────────────────────────────────────

/// A fully built network whose agents have not started yet.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation {
    pub(crate) config:     BikingConfig,
    pub(crate) stations:   Arc<StationRegistry>,
    pub(crate) van:        VanAgent,
    pub(crate) persons:    Vec<PersonAgent>,
    pub(crate) fleet_size: usize,
}

impl Simulation {
    pub fn config(&self) -> &BikingConfig {
        &self.config
    }

    /// The shared station table.
    pub fn stations(&self) -> &Arc<StationRegistry> {
        &self.stations
    }

    pub fn persons(&self) -> &[PersonAgent] {
        &self.persons
    }

    pub fn van(&self) -> &VanAgent {
        &self.van
    }

    /// Total bikes in the network.
    pub fn fleet_size(&self) -> usize {
        self.fleet_size
    }

    /// Spawn one named thread per agent.
    ///
    /// # Errors
    ///
    /// [`SimError::Spawn`] if the OS refuses a thread.  Agents already
    /// started are stopped again before the error is returned.
    pub fn start(self) -> SimResult<RunningSim> {
        let Simulation { config, stations, mut van, persons, fleet_size } = self;
        let stop = StopFlag::new();

        let mut running = RunningSim {
            stations: Arc::clone(&stations),
            stop:     stop.clone(),
            van:      None,
            persons:  Vec::with_capacity(persons.len()),
            started:  Instant::now(),
            fleet_size,
        };

        let van_id = van.id();
        let handle = thread::Builder::new()
            .name("van".into())
            .spawn({
                let stop = stop.clone();
                move || {
                    let stats = van.run(&stop);
                    (stats, van.cargo().len())
                }
            })
            .map_err(|source| SimError::Spawn { agent: van_id, source })?;
        running.van = Some((van_id, handle));

        for mut person in persons {
            let id = person.id();
            let handle = thread::Builder::new()
                .name(format!("person-{}", id.0))
                .spawn({
                    let stop = stop.clone();
                    move || person.run(&stop)
                })
                .map_err(|source| SimError::Spawn { agent: id, source })?;
            running.persons.push((id, handle));
        }

        info!(
            sites = config.sites,
            persons = running.persons.len(),
            bikes = fleet_size,
            "simulation started"
        );
        Ok(running)
    }

    /// Start, let the agents run for `duration` of wall-clock time, then stop.
    pub fn run_for(self, duration: Duration) -> SimResult<SimReport> {
        let running = self.start()?;
        thread::sleep(duration);
        running.stop()
    }
}

// ── RunningSim ────────────────────────────────────────────────────────────────

/// A simulation whose agent threads are running.
pub struct RunningSim {
    stations:   Arc<StationRegistry>,
    stop:       StopFlag,
    van:        Option<(AgentId, JoinHandle<(VanStats, usize)>)>,
    persons:    Vec<(AgentId, JoinHandle<PersonStats>)>,
    started:    Instant,
    fleet_size: usize,
}

impl RunningSim {
    /// The shared station table, for observing occupancy while running.
    pub fn stations(&self) -> &Arc<StationRegistry> {
        &self.stations
    }

    /// Stop every agent and wait for all threads to finish.
    ///
    /// # Errors
    ///
    /// [`SimError::AgentPanicked`] naming the first agent whose thread
    /// panicked.  Every thread is still joined before returning.
    pub fn stop(mut self) -> SimResult<SimReport> {
        self.halt();
        let elapsed = self.started.elapsed();
        let mut first_panic = None;

        let (van, van_cargo) = match self.van.take() {
            Some((id, handle)) => handle.join().unwrap_or_else(|_| {
                warn!(agent = %id, "van thread panicked");
                first_panic.get_or_insert(id);
                (VanStats::default(), 0)
            }),
            None => (VanStats::default(), 0),
        };

        let mut persons = Vec::with_capacity(self.persons.len());
        for (id, handle) in mem::take(&mut self.persons) {
            let stats = handle.join().unwrap_or_else(|_| {
                warn!(agent = %id, "person thread panicked");
                first_panic.get_or_insert(id);
                PersonStats::default()
            });
            persons.push((id, stats));
        }

        if let Some(id) = first_panic {
            return Err(SimError::AgentPanicked(id));
        }

        let report = SimReport {
            elapsed,
            persons,
            van,
            van_cargo,
            occupancy: self.stations.occupancy(),
            counts_by_type: self.stations.iter().map(BikeStation::counts_by_type).collect(),
            fleet_size: self.fleet_size,
        };
        info!(
            elapsed_ms = report.elapsed.as_millis() as u64,
            trips = report.total_trips(),
            van_cycles = report.van.cycles,
            docked = report.docked(),
            "simulation stopped"
        );
        Ok(report)
    }

    /// Raise the stop flag, then release every agent blocked in a station.
    /// The flag goes first so that a released agent exits instead of
    /// looping back into another station.
    fn halt(&self) {
        self.stop.request();
        self.stations.shutdown_all();
    }
}

impl Drop for RunningSim {
    fn drop(&mut self) {
        self.halt();
    }
}
