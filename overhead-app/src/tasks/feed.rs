//! Feed tasks
//!
//! Each task fetches on a fixed interval and publishes an `Arc` snapshot.
//! A failed fetch is logged and the previous snapshot stays published, so
//! it simply ages.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use overhead_core::data::{FlightFeed, FlightSnapshot, WeatherFeed, WeatherSnapshot};
use overhead_core::geo::Position;

use crate::channels::{FlightSlot, WeatherSlot};

/// Filtering and pacing for the flight task
#[derive(Debug, Clone, Copy)]
pub struct FlightFeedSettings {
    pub observer: Position,
    pub radius_km: f64,
    pub interval: Duration,
}

/// Poll a flight feed until shutdown
pub async fn run_flight_feed<F: FlightFeed>(
    mut feed: F,
    settings: FlightFeedSettings,
    publisher: watch::Sender<FlightSlot>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Flight feed started, every {} s", settings.interval.as_secs());
    let mut ticker = interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut failures = 0u32;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.wait_for(|stop| *stop) => break,
        }

        match feed.fetch().await {
            Ok(reports) => {
                let total = reports.len();
                let snapshot = FlightSnapshot::within_radius(
                    reports,
                    settings.observer,
                    settings.radius_km,
                    Instant::now(),
                );
                debug!(
                    "{} of {} aircraft within {} km",
                    snapshot.candidates(),
                    total,
                    settings.radius_km
                );
                if failures > 0 {
                    info!("Flight feed recovered after {} failures", failures);
                    failures = 0;
                }
                publisher.send_replace(Some(Arc::new(snapshot)));
            }
            Err(e) => {
                failures += 1;
                warn!("Flight fetch failed ({} consecutive): {}", failures, e);
            }
        }
    }

    debug!("Flight feed stopped");
}

/// Poll a weather feed until shutdown
pub async fn run_weather_feed<W: WeatherFeed>(
    mut feed: W,
    period: Duration,
    publisher: watch::Sender<WeatherSlot>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Weather feed started, every {} s", period.as_secs());
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.wait_for(|stop| *stop) => break,
        }

        match feed.fetch().await {
            Ok(report) => {
                debug!("Weather: {:.1}°C, {}", report.temperature_c, report.description());
                publisher.send_replace(Some(Arc::new(WeatherSnapshot::new(report, Instant::now()))));
            }
            Err(e) => warn!("Weather fetch failed: {}", e),
        }
    }

    debug!("Weather feed stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use overhead_core::data::{Aircraft, FeedError, WeatherReport};
    use std::collections::VecDeque;

    const LONDON: Position = Position {
        latitude: 51.5074,
        longitude: -0.1278,
    };

    /// Feed replaying canned results, then failing
    struct ScriptedFlights(VecDeque<Result<Vec<Aircraft>, FeedError>>);

    impl FlightFeed for ScriptedFlights {
        async fn fetch(&mut self) -> Result<Vec<Aircraft>, FeedError> {
            self.0
                .pop_front()
                .unwrap_or_else(|| Err(FeedError::Unavailable("script exhausted".into())))
        }
    }

    struct FailingWeather;

    impl WeatherFeed for FailingWeather {
        async fn fetch(&mut self) -> Result<WeatherReport, FeedError> {
            Err(FeedError::Malformed("bad spool".into()))
        }
    }

    fn at(lat: f64, lon: f64) -> Aircraft {
        Aircraft {
            latitude: lat,
            longitude: lon,
            registration: Some("G-TEST".into()),
            ..Default::default()
        }
    }

    fn settings() -> FlightFeedSettings {
        FlightFeedSettings {
            observer: LONDON,
            radius_km: 50.0,
            interval: Duration::from_secs(15),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_publishes_filtered_snapshot() {
        let (tx, mut rx) = watch::channel(None);
        let (stop_tx, stop_rx) = watch::channel(false);
        let feed = ScriptedFlights(VecDeque::from([Ok(vec![
            at(51.6, -0.1),
            at(48.8566, 2.3522),
        ])]));
        let task = tokio::spawn(run_flight_feed(feed, settings(), tx, stop_rx));

        rx.changed().await.unwrap();
        let snapshot = rx.borrow().clone().unwrap();
        assert_eq!(snapshot.candidates(), 1);

        stop_tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_snapshot() {
        let (tx, mut rx) = watch::channel(None);
        let (stop_tx, stop_rx) = watch::channel(false);
        let feed = ScriptedFlights(VecDeque::from([Ok(vec![at(51.6, -0.1)])]));
        let task = tokio::spawn(run_flight_feed(feed, settings(), tx, stop_rx));

        rx.changed().await.unwrap();
        let first = rx.borrow().clone().unwrap();

        // Second fetch fails
        tokio::time::sleep(Duration::from_secs(20)).await;
        let current = rx.borrow().clone().unwrap();
        assert!(Arc::ptr_eq(&first, &current));

        stop_tx.send(true).unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_weather_failure_publishes_nothing() {
        let (tx, rx) = watch::channel(None);
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(run_weather_feed(FailingWeather, Duration::from_secs(900), tx, stop_rx));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.borrow().is_none());

        stop_tx.send(true).unwrap();
        task.await.unwrap();
    }
}
