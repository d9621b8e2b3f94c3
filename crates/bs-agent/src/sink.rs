//! Notification sink trait for front ends observing the simulation.

use bs_core::{AgentId, SiteId};
use tracing::info;

/// Fire-and-forget callbacks invoked by the agents.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Agents never call a sink while holding
/// a station lock, so an implementation may block (e.g. to animate a trip)
/// without stalling other agents' station access.
///
/// The sink is shared by every agent thread, hence `Send + Sync` and `&self`
/// receivers; use interior mutability for any state.
///
/// # Example — trip counter
///
/// ```rust,ignore
/// struct TripCounter(AtomicU64);
///
/// impl NotificationSink for TripCounter {
///     fn on_travel(&self, _: AgentId, _: SiteId, _: SiteId, _: u64) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait NotificationSink: Send + Sync {
    /// A person started riding a bike from `from` to `to`.
    fn on_travel(&self, _agent: AgentId, _from: SiteId, _to: SiteId, _duration_ms: u64) {}

    /// A person started walking from `from` to `to`.
    fn on_walk(&self, _agent: AgentId, _from: SiteId, _to: SiteId, _duration_ms: u64) {}

    /// The van started driving from `from` to `to`.
    fn on_van_travel(&self, _from: SiteId, _to: SiteId, _duration_ms: u64) {}

    /// The number of bikes docked at `site` changed to `total`.
    ///
    /// `total` is read right after the change; concurrent agents may already
    /// have moved it again.
    fn on_occupancy_changed(&self, _site: SiteId, _total: usize) {}

    /// Free-form console text from an agent.
    fn on_log(&self, _agent: AgentId, _message: &str) {}
}

/// A [`NotificationSink`] that does nothing.
pub struct NoopSink;

impl NotificationSink for NoopSink {}

/// A [`NotificationSink`] that forwards every notification to `tracing`
/// under the `bikeshare::events` target.  Stand-in for a console front end.
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn on_travel(&self, agent: AgentId, from: SiteId, to: SiteId, duration_ms: u64) {
        info!(target: "bikeshare::events", agent = agent.0, from = from.0, to = to.0, duration_ms, "ride");
    }

    fn on_walk(&self, agent: AgentId, from: SiteId, to: SiteId, duration_ms: u64) {
        info!(target: "bikeshare::events", agent = agent.0, from = from.0, to = to.0, duration_ms, "walk");
    }

    fn on_van_travel(&self, from: SiteId, to: SiteId, duration_ms: u64) {
        info!(target: "bikeshare::events", from = from.0, to = to.0, duration_ms, "van drive");
    }

    fn on_occupancy_changed(&self, site: SiteId, total: usize) {
        info!(target: "bikeshare::events", site = site.0, total, "occupancy");
    }

    fn on_log(&self, agent: AgentId, message: &str) {
        info!(target: "bikeshare::console", agent = agent.0, "{message}");
    }
}
