//! Snapshot data model
//!
//! Flight and weather data arrive from external collaborators as immutable,
//! timestamped snapshots. The core never mutates them; it only asks how old
//! they are.

pub mod feed;
pub mod flight;
pub mod watchlist;
pub mod weather;

use std::time::{Duration, Instant};

pub use feed::{FeedError, FlightFeed, WeatherFeed};
pub use flight::{Aircraft, FlightSnapshot};
pub use watchlist::{Watchlist, WatchlistHit};
pub use weather::{compass_point, describe_weather_code, WeatherReport, WeatherSnapshot};

/// How usable a snapshot is right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Younger than its age limit
    Fresh,
    /// Published, but older than its age limit
    Stale,
    /// Nothing published yet
    Missing,
}

impl Freshness {
    /// Classify a snapshot taken at `fetched_at`
    ///
    /// # Arguments
    /// - `fetched_at`: Publication time, `None` if nothing was published
    /// - `now`: Current tick time
    /// - `max_age`: Oldest age still considered fresh
    pub fn classify(fetched_at: Option<Instant>, now: Instant, max_age: Duration) -> Self {
        match fetched_at {
            None => Freshness::Missing,
            Some(at) if now.saturating_duration_since(at) <= max_age => Freshness::Fresh,
            Some(_) => Freshness::Stale,
        }
    }

    pub fn is_fresh(self) -> bool {
        self == Freshness::Fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_classify() {
        let t0 = Instant::now();
        let limit = Duration::from_secs(45);

        assert_eq!(Freshness::classify(None, t0, limit), Freshness::Missing);
        assert_eq!(Freshness::classify(Some(t0), t0, limit), Freshness::Fresh);
        assert_eq!(
            Freshness::classify(Some(t0), t0 + limit, limit),
            Freshness::Fresh
        );
        assert_eq!(
            Freshness::classify(Some(t0), t0 + limit + Duration::from_millis(1), limit),
            Freshness::Stale
        );
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        // Snapshot stamped after the tick started
        let now = Instant::now();
        let later = now + Duration::from_millis(5);
        assert!(Freshness::classify(Some(later), now, Duration::from_secs(1)).is_fresh());
    }
}
