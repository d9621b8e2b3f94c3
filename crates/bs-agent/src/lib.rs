//! `bs-agent` — the autonomous agents of the bike-sharing simulation.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`sink`]    | `NotificationSink` trait, `NoopSink`, `TracingSink`               |
//! | [`context`] | `AgentContext` — registry, sink, and timing shared by all agents  |
//! | [`stop`]    | `StopFlag` — cooperative cancellation                             |
//! | [`person`]  | `PersonAgent` — borrow → ride → deposit → walk loop               |
//! | [`van`]     | `VanAgent` — depot → tour every site rebalancing → depot loop     |
//!
//! # Design notes
//!
//! Each agent runs on its own thread and owns its state outright (site,
//! cargo, RNG).  Agents never talk to each other; they only interact through
//! the stations.  The only places an agent can block are
//! `BikeStation::put_bike` and `BikeStation::get_bike`, and both return
//! promptly once the station is shut down, which is how a running
//! simulation is torn down.

pub mod context;
pub mod person;
pub mod sink;
pub mod stop;
pub mod van;


pub use context::AgentContext;
pub use person::{PersonAgent, PersonStats};
pub use sink::{NoopSink, NotificationSink, TracingSink};
pub use stop::StopFlag;
pub use van::{VanAgent, VanStats};
