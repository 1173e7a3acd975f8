//! Scripted demo mode
//!
//! `--test` runs the normal orchestrator against synthetic feeds: the splash,
//! then one sample aircraft overhead, then an empty sky with sample weather,
//! then a clean shutdown.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};
use tracing::info;

use overhead_core::data::{Aircraft, FeedError, FlightFeed, WeatherFeed, WeatherReport};
use overhead_core::geo::Position;

/// How long each scripted phase stays on screen
pub const PHASE: Duration = Duration::from_secs(5);

/// Aircraft shown during the flight phase
///
/// Placed 0.1° north-east of `observer` so it always falls inside a
/// sensible radius.
pub fn sample_aircraft(observer: Position) -> Aircraft {
    Aircraft {
        flight_number: Some("BA123".into()),
        callsign: Some("BAW123".into()),
        aircraft_type: Some("A320".into()),
        airline: Some("British Airways".into()),
        origin: Some("LHR".into()),
        destination: Some("CDG".into()),
        altitude_ft: Some(35000),
        ground_speed_kts: Some(450),
        heading: Some(135),
        latitude: observer.latitude + 0.1,
        longitude: observer.longitude + 0.1,
        vertical_speed_fpm: Some(0),
        distance_km: 12.5,
        registration: Some("G-EUPT".into()),
        squawk: Some("1234".into()),
    }
}

pub fn sample_weather() -> WeatherReport {
    WeatherReport {
        temperature_c: 15.0,
        feels_like_c: 13.5,
        humidity: 72,
        wind_speed_kmh: 14.0,
        wind_direction: 225,
        wind_gusts_kmh: 26.0,
        pressure_hpa: 1014.0,
        weather_code: 2,
        description: None,
        is_day: true,
        sunrise: Some("05:42".into()),
        sunset: Some("20:51".into()),
        temp_max_c: 18.0,
        temp_min_c: 9.0,
        precipitation_mm: 0.2,
    }
}

/// Demo flight source: the sample aircraft until `clear_at`, then nothing
pub struct DemoFlightFeed {
    observer: Position,
    clear_at: Instant,
}

impl DemoFlightFeed {
    pub fn new(observer: Position, clear_at: Instant) -> Self {
        Self { observer, clear_at }
    }
}

impl FlightFeed for DemoFlightFeed {
    async fn fetch(&mut self) -> Result<Vec<Aircraft>, FeedError> {
        if Instant::now() < self.clear_at {
            Ok(vec![sample_aircraft(self.observer)])
        } else {
            Ok(Vec::new())
        }
    }
}

/// Demo weather source
pub struct DemoWeatherFeed;

impl WeatherFeed for DemoWeatherFeed {
    async fn fetch(&mut self) -> Result<WeatherReport, FeedError> {
        Ok(sample_weather())
    }
}

/// Phase boundaries for a demo started at `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSchedule {
    /// Sample aircraft disappears
    pub clear_at: Instant,
    /// Shutdown is requested
    pub end_at: Instant,
}

impl DemoSchedule {
    /// # Arguments
    /// - `start`: process start
    /// - `splash`: minimum splash time; the flight phase starts after it
    pub fn new(start: Instant, splash: Duration) -> Self {
        let clear_at = start + splash + PHASE;
        Self {
            clear_at,
            end_at: clear_at + PHASE,
        }
    }
}

/// Wait out the script, then request shutdown
pub async fn run_script(schedule: DemoSchedule, shutdown: watch::Sender<bool>) {
    info!("Demo: flight screen for {} s", PHASE.as_secs());
    sleep_until(schedule.clear_at).await;
    info!("Demo: idle screen for {} s", PHASE.as_secs());
    sleep_until(schedule.end_at).await;
    info!("Demo complete");
    let _ = shutdown.send(true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use overhead_core::data::FlightSnapshot;

    const LONDON: Position = Position {
        latitude: 51.5074,
        longitude: -0.1278,
    };

    #[test]
    fn test_sample_aircraft_inside_default_radius() {
        let snapshot = FlightSnapshot::within_radius(
            vec![sample_aircraft(LONDON)],
            LONDON,
            50.0,
            std::time::Instant::now(),
        );
        assert_eq!(snapshot.candidates(), 1);
        assert!(snapshot.aircraft[0].distance_km < 20.0);
    }

    #[test]
    fn test_schedule_phases() {
        let start = Instant::now();
        let schedule = DemoSchedule::new(start, Duration::from_secs(3));
        assert_eq!(schedule.clear_at - start, Duration::from_secs(8));
        assert_eq!(schedule.end_at - start, Duration::from_secs(13));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flight_feed_clears() {
        let mut feed = DemoFlightFeed::new(LONDON, Instant::now() + Duration::from_secs(5));
        assert_eq!(feed.fetch().await.unwrap().len(), 1);
        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(feed.fetch().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_requests_shutdown() {
        let (tx, mut rx) = watch::channel(false);
        let schedule = DemoSchedule::new(Instant::now(), Duration::from_secs(3));
        tokio::spawn(run_script(schedule, tx));
        rx.wait_for(|stop| *stop).await.unwrap();
        assert!(Instant::now() >= schedule.end_at);
    }
}
