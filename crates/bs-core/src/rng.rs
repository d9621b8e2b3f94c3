//! Deterministic per-agent and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! Agents run on their own OS threads, so each one owns its RNG outright and
//! no synchronisation is needed.  Thread interleaving still makes whole runs
//! non-reproducible; only each agent's own choice sequence is fixed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, SiteId};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Moved into the agent's thread at spawn time and never shared.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Pick a site uniformly among `0..sites`, excluding `except`.
    ///
    /// With a single site there is nowhere else to go and `except` is
    /// returned unchanged.
    pub fn other_site(&mut self, sites: usize, except: SiteId) -> SiteId {
        if sites < 2 {
            return except;
        }
        // Draw from n-1 slots and skip over the excluded one.
        let pick = self.0.gen_range(0..sites - 1);
        let pick = if pick >= except.index() { pick + 1 } else { pick };
        SiteId(pick as u32)
    }

    /// A travel duration of `base_ms` plus a uniform jitter in `0..=jitter_ms`.
    #[inline]
    pub fn travel_ms(&mut self, base_ms: u64, jitter_ms: u64) -> u64 {
        base_ms.saturating_add(self.0.gen_range(0..=jitter_ms))
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for set-up decisions (initial stock, preferred bike
/// types, starting sites).
///
/// Used only while building the simulation, before any agent thread exists.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
