//! Aircraft records and flight snapshots

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geo::Position;

/// One aircraft as reported by the flight collaborator
///
/// Everything except position is optional: feeds routinely omit route and
/// type data for private and military traffic.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Aircraft {
    /// Commercial flight number (e.g. "BA123")
    pub flight_number: Option<String>,
    /// ATC callsign (e.g. "BAW123")
    pub callsign: Option<String>,
    /// ICAO type designator (e.g. "A320")
    pub aircraft_type: Option<String>,
    pub airline: Option<String>,
    /// Origin airport code
    pub origin: Option<String>,
    /// Destination airport code
    pub destination: Option<String>,
    /// Barometric altitude in feet
    pub altitude_ft: Option<i32>,
    /// Ground speed in knots
    pub ground_speed_kts: Option<u16>,
    /// Track in degrees, 0 = north
    pub heading: Option<u16>,
    pub latitude: f64,
    pub longitude: f64,
    /// Vertical rate in feet per minute
    pub vertical_speed_fpm: Option<i32>,
    /// Distance from the observer, filled in by [`FlightSnapshot::within_radius`]
    pub distance_km: f64,
    /// Tail registration (e.g. "G-EUPT")
    pub registration: Option<String>,
    pub squawk: Option<String>,
}

impl Aircraft {
    pub fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }

    /// Best identifier to headline this aircraft with
    pub fn display_ident(&self) -> Option<&str> {
        self.flight_number
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.callsign.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Aircraft inside the configured radius at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSnapshot {
    /// Closest first
    pub aircraft: Vec<Aircraft>,
    /// When the collaborator published this snapshot
    pub fetched_at: Instant,
}

impl FlightSnapshot {
    /// Wrap an already filtered list
    pub fn new(aircraft: Vec<Aircraft>, fetched_at: Instant) -> Self {
        Self {
            aircraft,
            fetched_at,
        }
    }

    /// Build a snapshot from raw reports
    ///
    /// Recomputes each distance from `observer`, drops aircraft beyond
    /// `radius_km` and orders the rest closest first. Distances are rounded
    /// to 0.1 km.
    pub fn within_radius(
        reports: Vec<Aircraft>,
        observer: Position,
        radius_km: f64,
        fetched_at: Instant,
    ) -> Self {
        let mut aircraft: Vec<Aircraft> = reports
            .into_iter()
            .filter_map(|mut a| {
                let d = observer.distance_km(&a.position());
                if d <= radius_km {
                    a.distance_km = (d * 10.0).round() / 10.0;
                    Some(a)
                } else {
                    None
                }
            })
            .collect();
        aircraft.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Self::new(aircraft, fetched_at)
    }

    /// Age relative to `now`
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.fetched_at)
    }

    /// Number of aircraft that could be shown
    pub fn candidates(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lon: f64, reg: &str) -> Aircraft {
        Aircraft {
            latitude: lat,
            longitude: lon,
            registration: Some(reg.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_within_radius_filters_and_sorts() {
        let home = Position::new(51.5074, -0.1278);
        let reports = vec![
            at(51.60, -0.10, "G-MID"),  // ~10 km
            at(53.00, -0.10, "G-FAR"),  // ~165 km
            at(51.52, -0.13, "G-NEAR"), // ~1.4 km
        ];
        let snap = FlightSnapshot::within_radius(reports, home, 50.0, Instant::now());

        let regs: Vec<_> = snap
            .aircraft
            .iter()
            .map(|a| a.registration.as_deref().unwrap())
            .collect();
        assert_eq!(regs, ["G-NEAR", "G-MID"]);
        assert!(snap.aircraft[0].distance_km < snap.aircraft[1].distance_km);
    }

    #[test]
    fn test_distance_rounded() {
        let home = Position::new(51.5074, -0.1278);
        let snap = FlightSnapshot::within_radius(
            vec![at(51.60, -0.10, "G-MID")],
            home,
            50.0,
            Instant::now(),
        );
        let d = snap.aircraft[0].distance_km;
        assert_eq!(d, (d * 10.0).round() / 10.0);
    }

    #[test]
    fn test_display_ident_prefers_flight_number() {
        let mut a = Aircraft {
            callsign: Some("BAW123".into()),
            ..Default::default()
        };
        assert_eq!(a.display_ident(), Some("BAW123"));
        a.flight_number = Some("BA123".into());
        assert_eq!(a.display_ident(), Some("BA123"));
        a.flight_number = Some(String::new());
        assert_eq!(a.display_ident(), Some("BAW123"));
    }
}
