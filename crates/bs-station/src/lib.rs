//! `bs-station` — the synchronization core of the bike-sharing simulation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`station`]  | `BikeStation` — bounded, per-type FIFO bike store           |
//! | [`registry`] | `StationRegistry` — immutable site → station table          |
//! | [`error`]    | `StationClosed`, `DockRefused` (shutdown outcomes)          |
//!
//! # Blocking model
//!
//! Only [`BikeStation::put_bike`] and [`BikeStation::get_bike`] block.  The
//! batch calls (`add_bikes`, `get_bikes`) and the queries never do.  Each
//! station has its own lock and no call ever holds two station locks, so
//! there is no cross-station lock ordering to get wrong.
//!
//! [`BikeStation::shutdown`] is the only cancellation primitive: it releases
//! every thread blocked on that station, and every later blocking call
//! returns the shutdown outcome immediately.

pub mod error;
pub mod registry;
pub mod station;

#[cfg(test)]
mod tests;

pub use error::{DockRefused, StationClosed};
pub use registry::StationRegistry;
pub use station::BikeStation;
