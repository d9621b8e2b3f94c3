//! `bs-core` — foundational types for the bike-sharing simulation.
//!
//! This crate is a dependency of every other `bs-*` crate.  It has no `bs-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `SiteId`, `BikeType`, `BikeId`             |
//! | [`bike`]        | `Bike` (move-only value), `BikeFleet` (bike minting)  |
//! | [`config`]      | `BikingConfig`, `Timing`                              |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`error`]       | `BsError`, `BsResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and configuration.   |

pub mod bike;
pub mod config;
pub mod error;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bike::{Bike, BikeFleet};
pub use config::{BikingConfig, MAX_TIME_SCALE, MAX_TRIP_MS, REBALANCE_HEADROOM, Timing};
pub use error::{BsError, BsResult};
pub use ids::{AgentId, BikeId, BikeType, SiteId};
pub use rng::{AgentRng, SimRng};
