//! Framework error type.
//!
//! Station shutdown is deliberately *not* represented here: it is a normal
//! terminal outcome of a blocking call and has its own types in `bs-station`.

use thiserror::Error;

use crate::{BikeType, SiteId};

/// The top-level error type for `bs-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum BsError {
    #[error("site {0} not found")]
    SiteNotFound(SiteId),

    #[error("bike type {0} out of range (fleet has {1} types)")]
    BikeTypeOutOfRange(BikeType, usize),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `bs-*` crates.
pub type BsResult<T> = Result<T, BsError>;
