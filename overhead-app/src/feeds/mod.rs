//! Live feed implementations
//!
//! The HTTP side of flight and weather retrieval runs outside this process
//! and drops its results into spool files; the feeds here read them.

mod spool;

pub use spool::{SpoolFlightFeed, SpoolWeatherFeed};
