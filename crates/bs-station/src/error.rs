//! Shutdown outcomes of the blocking station calls.
//!
//! These are terminal signals, not failures to retry: a caller receiving one
//! should leave its loop.

use bs_core::Bike;
use thiserror::Error;

/// Returned by [`get_bike`][crate::BikeStation::get_bike] once the station is
/// shutting down.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("station is shutting down")]
pub struct StationClosed;

/// Returned by [`put_bike`][crate::BikeStation::put_bike] once the station is
/// shutting down.  Hands the undocked bike back to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("station is shutting down; {0} was not docked")]
pub struct DockRefused(pub Bike);

impl DockRefused {
    /// Take back the bike that was not docked.
    pub fn into_bike(self) -> Bike {
        self.0
    }
}
