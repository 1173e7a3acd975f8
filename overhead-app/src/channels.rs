//! Snapshot slots shared between feed tasks and the render loop
//!
//! Each collaborator publishes whole immutable snapshots into a `watch`
//! slot. The render thread takes a point-in-time `Arc` clone on every tick
//! and never waits on a fetch.

use std::sync::Arc;

use tokio::sync::watch;

use overhead_core::data::{FlightSnapshot, WeatherSnapshot};

/// Latest flight snapshot, `None` until the first publish
pub type FlightSlot = Option<Arc<FlightSnapshot>>;

/// Latest weather snapshot, `None` until the first publish
pub type WeatherSlot = Option<Arc<WeatherSnapshot>>;

/// Publishing halves, one per feed task
pub struct Publishers {
    pub flights: watch::Sender<FlightSlot>,
    pub weather: watch::Sender<WeatherSlot>,
}

/// Reading halves, owned by the render loop
#[derive(Clone)]
pub struct Snapshots {
    flights: watch::Receiver<FlightSlot>,
    weather: watch::Receiver<WeatherSlot>,
}

impl Snapshots {
    /// Current flight snapshot
    pub fn flights(&self) -> FlightSlot {
        self.flights.borrow().clone()
    }

    /// Current weather snapshot
    pub fn weather(&self) -> WeatherSlot {
        self.weather.borrow().clone()
    }
}

/// Create empty slots
pub fn snapshot_channels() -> (Publishers, Snapshots) {
    let (flights_tx, flights_rx) = watch::channel(None);
    let (weather_tx, weather_rx) = watch::channel(None);
    (
        Publishers {
            flights: flights_tx,
            weather: weather_tx,
        },
        Snapshots {
            flights: flights_rx,
            weather: weather_rx,
        },
    )
}

/// Shutdown broadcast: `true` once the process should stop
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_slots_start_empty() {
        let (_publishers, snapshots) = snapshot_channels();
        assert!(snapshots.flights().is_none());
        assert!(snapshots.weather().is_none());
    }

    #[test]
    fn test_reader_sees_latest_publish() {
        let (publishers, snapshots) = snapshot_channels();
        let first = Arc::new(FlightSnapshot::new(Vec::new(), Instant::now()));
        publishers.flights.send_replace(Some(first.clone()));
        let held = snapshots.flights().unwrap();

        let second = Arc::new(FlightSnapshot::new(Vec::new(), Instant::now()));
        publishers.flights.send_replace(Some(second.clone()));

        // The earlier clone is unaffected by the new publish
        assert!(Arc::ptr_eq(&held, &first));
        assert!(Arc::ptr_eq(&snapshots.flights().unwrap(), &second));
    }
}
