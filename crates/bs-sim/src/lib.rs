//! `bs-sim` — builds a bike-sharing network and runs it, one OS thread per
//! agent.
//!
//! # Lifecycle
//!
//! ```text
//! SimBuilder::new(config)        validate config, stock stations,
//!     .sink(sink).build()?       create the van and the persons
//!   → Simulation                 nothing running yet
//!       .start()?                spawn one thread per agent
//!   → RunningSim                 agents borrow, ride, rebalance …
//!       .stop()?                 ① raise the stop flag
//!                                ② shut every station down (unblocks agents)
//!                                ③ join every thread
//!   → SimReport
//! ```
//!
//! Dropping a `RunningSim` without calling `stop` still performs ① and ②, so
//! no agent thread is left blocked forever; the threads are detached rather
//! than joined.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bs_core::BikingConfig;
//! use bs_sim::SimBuilder;
//!
//! let report = SimBuilder::new(BikingConfig::default())
//!     .build()?
//!     .run_for(Duration::from_secs(10))?;
//! println!("{} trips", report.total_trips());
//! ```

pub mod builder;
pub mod error;
pub mod report;
pub mod sim;


pub use builder::{SimBuilder, VAN_ID};
pub use error::{SimError, SimResult};
pub use report::SimReport;
pub use sim::{RunningSim, Simulation};
