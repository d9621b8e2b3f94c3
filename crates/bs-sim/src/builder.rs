//! Fluent builder for constructing a [`Simulation`].

use std::sync::Arc;

use bs_agent::{AgentContext, NoopSink, NotificationSink, PersonAgent, VanAgent};
use bs_core::{AgentId, AgentRng, BikeFleet, BikeType, BikingConfig, SimRng, SiteId};
use bs_station::StationRegistry;
use tracing::debug;

use crate::{SimResult, Simulation};

/// The van's agent id.  Persons are numbered from 1.
pub const VAN_ID: AgentId = AgentId(0);

/// Fluent builder for [`Simulation`].
///
/// # Required inputs
///
/// - [`BikingConfig`] — sites, capacities, fleet size, timing, seed
///
/// # Optional inputs (have defaults)
///
/// | Method      | Default      |
/// |-------------|--------------|
/// | `.sink(s)`  | [`NoopSink`] |
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimBuilder::new(config)
///     .sink(Arc::new(TracingSink))
///     .build()?;
/// let running = sim.start()?;
/// ```
pub struct SimBuilder {
    config: BikingConfig,
    sink:   Option<Arc<dyn NotificationSink>>,
}

impl SimBuilder {
    pub fn new(config: BikingConfig) -> Self {
        Self { config, sink: None }
    }

    /// Supply the notification sink every agent reports to.
    pub fn sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate the configuration, stock the stations, and create the agents.
    ///
    /// All random set-up decisions (initial bike kinds, preferred types,
    /// starting sites) derive from `config.seed`, so two builds with the same
    /// configuration start from identical states.
    pub fn build(self) -> SimResult<Simulation> {
        let config = self.config;
        config.validate()?;

        let mut root = SimRng::new(config.seed);
        let mut stock_rng = root.child(1);
        let mut agent_rng = root.child(2);

        // ── Stations ──────────────────────────────────────────────────────
        let mut fleet = BikeFleet::new(config.bike_types);
        let stations = Arc::new(StationRegistry::stocked(&config, &mut fleet, &mut stock_rng));

        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(NoopSink) as Arc<dyn NotificationSink>);
        let ctx = AgentContext::new(Arc::clone(&stations), sink, config.timing);

        // ── Agents ────────────────────────────────────────────────────────
        let van = VanAgent::new(
            VAN_ID,
            config.van_capacity,
            ctx.clone(),
            AgentRng::new(config.seed, VAN_ID),
        );

        // `validate` keeps `persons` below `u32::MAX`, so the cast is lossless.
        let persons = (1..=config.persons as u32)
            .map(|i| {
                let id = AgentId(i);
                let preferred = BikeType(agent_rng.gen_range(0..config.bike_types) as u8);
                let start = SiteId(agent_rng.gen_range(0..config.sites) as u32);
                PersonAgent::new(id, preferred, start, ctx.clone(), AgentRng::new(config.seed, id))
            })
            .collect::<Vec<_>>();

        debug!(
            sites = config.sites,
            persons = persons.len(),
            bikes = fleet.minted(),
            "simulation built"
        );

        Ok(Simulation {
            fleet_size: fleet.minted(),
            config,
            stations,
            van,
            persons,
        })
    }
}
