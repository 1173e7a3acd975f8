//! Collaborator interfaces
//!
//! Flight and weather retrieval happen outside the display core. A feed
//! only has to hand back the latest data it has; the feed tasks stamp and
//! publish it.

use std::future::Future;

use thiserror::Error;

use super::flight::Aircraft;
use super::weather::WeatherReport;

/// Feed errors
///
/// A failed fetch never clears the published snapshot; it just ages.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Source not available yet (no spool file, network down)
    #[error("feed source unavailable: {0}")]
    Unavailable(String),
    /// Source returned data that could not be decoded
    #[error("feed data malformed: {0}")]
    Malformed(String),
}

/// Source of aircraft reports
pub trait FlightFeed {
    /// Fetch every aircraft currently reported, unfiltered
    fn fetch(&mut self) -> impl Future<Output = Result<Vec<Aircraft>, FeedError>> + Send;
}

/// Source of weather reports
pub trait WeatherFeed {
    /// Fetch current conditions
    fn fetch(&mut self) -> impl Future<Output = Result<WeatherReport, FeedError>> + Send;
}
