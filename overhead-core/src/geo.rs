//! Great-circle distance

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the Earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Haversine distance to `other` in kilometres
    pub fn distance_km(&self, other: &Position) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let london = Position::new(51.5074, -0.1278);
        assert!(london.distance_km(&london) < 1e-9);
    }

    #[test]
    fn test_london_to_paris() {
        let london = Position::new(51.5074, -0.1278);
        let paris = Position::new(48.8566, 2.3522);
        let d = london.distance_km(&paris);
        assert!((d - 343.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let a = Position::new(40.6413, -73.7781);
        let b = Position::new(33.9416, -118.4085);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }
}
