//! Screen renderers
//!
//! Each screen turns a small borrowed view of the current data into a
//! [`Scene`]. Screens never fail: missing fields render as a placeholder.

mod flight;
mod idle;
mod loading;
pub mod theme;

pub use flight::FlightView;
pub use idle::{IdleView, WeatherView};
pub use loading::{LoadingStatus, LoadingView};

use overhead_core::geometry::Resolution;

use crate::frame::LogicalFrame;
use crate::scene::Scene;

/// Shown in place of unknown or stale values
pub const PLACEHOLDER: &str = "--";

/// The screen to draw on this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen<'a> {
    Loading(LoadingView),
    Flight(FlightView<'a>),
    Idle(IdleView<'a>),
}

impl Screen<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Loading(_) => "loading",
            Screen::Flight(_) => "flight",
            Screen::Idle(_) => "idle",
        }
    }

    /// Describe the screen at `resolution`
    pub fn scene(&self, resolution: Resolution) -> Scene {
        match self {
            Screen::Loading(view) => view.scene(resolution),
            Screen::Flight(view) => view.scene(resolution),
            Screen::Idle(view) => view.scene(resolution),
        }
    }

    /// Draw the screen into `frame`, replacing its contents
    pub fn render(&self, frame: &mut LogicalFrame) {
        let scene = self.scene(frame.resolution());
        scene
            .rasterize(frame)
            .unwrap_or_else(|never| match never {});
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use embedded_graphics::pixelcolor::Rgb888;
    use overhead_core::data::{Aircraft, WatchlistHit, WeatherReport};

    const RES: Resolution = Resolution::new(480, 320);

    fn aircraft() -> Aircraft {
        Aircraft {
            flight_number: Some("BA123".into()),
            callsign: Some("BAW123".into()),
            aircraft_type: Some("A320".into()),
            airline: Some("British Airways".into()),
            origin: Some("LHR".into()),
            destination: Some("CDG".into()),
            altitude_ft: Some(35_000),
            ground_speed_kts: Some(450),
            heading: Some(135),
            latitude: 51.6,
            longitude: -0.03,
            vertical_speed_fpm: Some(0),
            distance_km: 12.5,
            registration: Some("G-EUPT".into()),
            squawk: Some("1234".into()),
        }
    }

    fn noon() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .and_then(|d| d.and_hms_opt(12, 34, 0))
            .unwrap()
    }

    fn weather() -> WeatherReport {
        WeatherReport {
            temperature_c: 15.0,
            feels_like_c: 13.2,
            humidity: 70,
            wind_speed_kmh: 12.0,
            wind_direction: 225,
            weather_code: 2,
            sunrise: Some("04:43".into()),
            sunset: Some("21:18".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_loading_without_network() {
        let screen = Screen::Loading(LoadingView {
            status: LoadingStatus::Initializing,
            ip: None,
        });
        let scene = screen.scene(RES);
        assert!(scene.contains_text("Flight Tracker"));
        assert!(scene.contains_text("No network"));
        assert!(scene.contains_text("Initializing"));
    }

    #[test]
    fn test_loading_shows_address() {
        let screen = Screen::Loading(LoadingView {
            status: LoadingStatus::ScanningFlights,
            ip: Some("192.168.1.20".parse().unwrap()),
        });
        assert!(screen.scene(RES).contains_text("192.168.1.20"));
    }

    #[test]
    fn test_flight_fields() {
        let a = aircraft();
        let screen = Screen::Flight(FlightView {
            aircraft: &a,
            index: 1,
            count: 3,
            radius_km: 50.0,
            watch: None,
        });
        let scene = screen.scene(RES);
        assert!(scene.contains_text("BA123"));
        assert!(scene.contains_text("G-EUPT"));
        assert!(scene.contains_text("2/3 flights in 50 km radius"));
        assert!(scene.contains_text("12.5 km"));
        assert!(scene.contains_text("35k ft"));
        assert!(scene.contains_text("450 kts"));
        assert!(scene.contains_text("135"));
        assert!(!scene.contains_text("WATCHLIST"));
    }

    #[test]
    fn test_flight_missing_fields_use_placeholder() {
        let a = Aircraft {
            distance_km: 4.0,
            ..Default::default()
        };
        let screen = Screen::Flight(FlightView {
            aircraft: &a,
            index: 0,
            count: 1,
            radius_km: 50.0,
            watch: None,
        });
        let scene = screen.scene(RES);
        assert!(scene.contains_text("1 flight in 50 km radius"));
        assert!(scene.contains_text("-- kts"));
        assert!(scene.contains_text("Aircraft: --"));
    }

    #[test]
    fn test_flight_watchlist_theme() {
        let a = aircraft();
        let screen = Screen::Flight(FlightView {
            aircraft: &a,
            index: 0,
            count: 1,
            radius_km: 50.0,
            watch: Some(WatchlistHit {
                registration: "G-EUPT",
                name: Some("Speedbird"),
            }),
        });
        let scene = screen.scene(RES);
        assert!(scene.contains_text("* G-EUPT"));
        assert!(scene.contains_text("* Speedbird *"));

        let mut frame = LogicalFrame::new(RES);
        screen.render(&mut frame);
        // Body background takes the watchlist tint
        assert_eq!(frame.pixel(5, 180), Some(theme::palette::WATCHLIST_BG));
    }

    #[test]
    fn test_idle_with_weather() {
        let w = weather();
        let screen = Screen::Idle(IdleView {
            now: noon(),
            weather: WeatherView::Fresh(&w),
            page: 0,
            location: "London",
        });
        let scene = screen.scene(RES);
        assert!(scene.contains_text("12:34"));
        assert!(scene.contains_text("Monday, June 03"));
        assert!(scene.contains_text("15.0"));
        assert!(scene.contains_text("Partly cloudy"));
        assert!(scene.contains_text("Wind: SW 12 km/h"));
        assert!(scene.contains_text("London  [1/3]"));
    }

    #[test]
    fn test_idle_pages_cycle() {
        let w = weather();
        let view = |page| IdleView {
            now: noon(),
            weather: WeatherView::Fresh(&w),
            page,
            location: "London",
        };
        assert!(view(1).scene(RES).contains_text("Pressure:"));
        assert!(view(2).scene(RES).contains_text("Sunrise: 04:43"));
        assert!(view(3).scene(RES).contains_text("Humidity: 70%"));
    }

    #[test]
    fn test_idle_stale_weather_uses_placeholder() {
        let screen = Screen::Idle(IdleView {
            now: noon(),
            weather: WeatherView::Stale,
            page: 0,
            location: "London",
        });
        let scene = screen.scene(RES);
        assert!(scene.contains_text("--\u{b0}C"));
        assert!(!scene.contains_text("15.0"));
    }

    #[test]
    fn test_idle_missing_weather() {
        let screen = Screen::Idle(IdleView {
            now: noon(),
            weather: WeatherView::Missing,
            page: 0,
            location: "London",
        });
        let scene = screen.scene(RES);
        assert!(scene.contains_text("Weather unavailable"));
        assert!(scene.contains_text("Scanning for flights"));
    }

    #[test]
    fn test_render_fills_frame() {
        let screen = Screen::Loading(LoadingView {
            status: LoadingStatus::Initializing,
            ip: None,
        });
        let mut frame = LogicalFrame::filled(RES, Rgb888::new(1, 2, 3));
        screen.render(&mut frame);
        assert_eq!(frame.pixel(0, 0), Some(Rgb888::new(0, 0, 0)));
        assert_eq!(frame.resolution(), RES);
    }
}
