//! Active flight screen

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use heapless::String;

use overhead_core::data::{Aircraft, WatchlistHit};
use overhead_core::geometry::Resolution;

use super::theme::{altitude_color, palette, Theme};
use super::PLACEHOLDER;
use crate::scene::{Anchor, DrawOp, FontSize, Scene};

/// Inputs for the flight screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightView<'a> {
    pub aircraft: &'a Aircraft,
    /// Zero-based position in the candidate list
    pub index: usize,
    /// Candidates in range
    pub count: usize,
    pub radius_km: f64,
    /// Watchlist match for this aircraft's registration
    pub watch: Option<WatchlistHit<'a>>,
}

/// Climb/descent marker and its color
fn vertical_indicator(fpm: Option<i32>) -> (&'static str, Rgb888) {
    match fpm {
        Some(v) if v > 100 => ("^", palette::CLIMBING),
        Some(v) if v < -100 => ("v", palette::DESCENDING),
        _ => ("=", palette::SECONDARY),
    }
}

/// Width of the climb marker plus its trailing space
const MARKER_ADVANCE: i32 = 20;

fn format_altitude(feet: i32) -> String<16> {
    let mut s = String::new();
    if feet >= 1000 {
        let _ = write!(s, "{}k ft", feet / 1000);
    } else {
        let _ = write!(s, "{} ft", feet);
    }
    s
}

fn or_placeholder(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

impl FlightView<'_> {
    pub(crate) fn scene(&self, res: Resolution) -> Scene {
        let (w, h) = (res.width as i32, res.height as i32);
        let cx = w / 2;
        let a = self.aircraft;
        let theme = if self.watch.is_some() {
            Theme::WATCHLIST
        } else {
            Theme::STANDARD
        };

        let mut scene = Scene::new();
        scene.clear(theme.background);

        // Header bar
        scene.fill_rect(Point::zero(), Size::new(res.width, 35), theme.header);
        scene.hline(0, w - 1, 34, palette::DIVIDER);
        let header = if self.count > 1 {
            format!(
                "{}/{} flights in {} km radius (tap to cycle)",
                self.index + 1,
                self.count,
                self.radius_km
            )
        } else {
            format!("1 flight in {} km radius", self.radius_km)
        };
        scene.text(header, Point::new(10, 11), Anchor::TopLeft, FontSize::Small, palette::SECONDARY);
        scene.text(
            format!("{:.1} km", a.distance_km),
            Point::new(w - 10, 11),
            Anchor::TopRight,
            FontSize::Small,
            palette::ACCENT,
        );

        // Identity and route
        scene.text(
            or_placeholder(a.display_ident()),
            Point::new(cx, 50),
            Anchor::TopCenter,
            FontSize::Large,
            palette::TEXT,
        );
        scene.text(
            or_placeholder(a.airline.as_deref()),
            Point::new(cx, 105),
            Anchor::TopCenter,
            FontSize::Medium,
            palette::ACCENT,
        );
        scene.text(
            format!(
                "{}  \u{bb}  {}",
                or_placeholder(a.origin.as_deref()),
                or_placeholder(a.destination.as_deref())
            ),
            Point::new(cx, 135),
            Anchor::TopCenter,
            FontSize::Medium,
            palette::TEXT,
        );

        scene.hline(20, w - 20, 192, palette::DIVIDER);

        // Altitude / speed / heading columns
        let y = 210;
        scene.text("ALT", Point::new(30, y), Anchor::TopLeft, FontSize::Small, palette::SECONDARY);
        match a.altitude_ft {
            Some(ft) => {
                let (marker, marker_color) = vertical_indicator(a.vertical_speed_fpm);
                scene.text(marker, Point::new(30, y + 20), Anchor::TopLeft, FontSize::Medium, marker_color);
                scene.text(
                    format_altitude(ft).as_str(),
                    Point::new(30 + MARKER_ADVANCE, y + 20),
                    Anchor::TopLeft,
                    FontSize::Medium,
                    altitude_color(ft),
                );
            }
            None => {
                scene.text(PLACEHOLDER, Point::new(30, y + 20), Anchor::TopLeft, FontSize::Medium, palette::SECONDARY);
            }
        }

        let speed = match a.ground_speed_kts {
            Some(kts) => format!("{} kts", kts),
            None => format!("{} kts", PLACEHOLDER),
        };
        scene.text("SPD", Point::new(cx - 30, y), Anchor::TopLeft, FontSize::Small, palette::SECONDARY);
        scene.text(speed, Point::new(cx - 30, y + 20), Anchor::TopLeft, FontSize::Medium, palette::TEXT);

        let heading = match a.heading {
            Some(deg) => format!("{:03}\u{b0}", deg % 360),
            None => format!("{}\u{b0}", PLACEHOLDER),
        };
        scene.text("HDG", Point::new(w - 100, y), Anchor::TopLeft, FontSize::Small, palette::SECONDARY);
        scene.text(heading, Point::new(w - 100, y + 20), Anchor::TopLeft, FontSize::Medium, palette::TEXT);

        // Type and registration
        scene.hline(20, w - 20, 265, palette::DIVIDER);
        scene.text(
            format!("Aircraft: {}", or_placeholder(a.aircraft_type.as_deref())),
            Point::new(30, 280),
            Anchor::TopLeft,
            FontSize::Small,
            palette::SECONDARY,
        );
        if let Some(reg) = a.registration.as_deref().filter(|r| !r.is_empty()) {
            let (text, color) = match self.watch {
                Some(_) => (format!("* {}", reg), palette::WATCHLIST),
                None => (reg.to_string(), palette::SECONDARY),
            };
            scene.text(text, Point::new(w - 30, 280), Anchor::TopRight, FontSize::Small, color);
        }

        scene.push(DrawOp::Plane {
            center: Point::new(w - 50, 70),
            size: 40,
            heading: a.heading.unwrap_or(0),
            color: theme.highlight,
        });

        if let Some(hit) = self.watch {
            let banner = match hit.name {
                Some(name) => format!("* {} *", name),
                None => "* WATCHLIST *".to_string(),
            };
            scene.text(banner, Point::new(10, h - 8), Anchor::BottomLeft, FontSize::Small, palette::WATCHLIST);
        }

        scene.text(
            "flightradar24.com",
            Point::new(w - 10, h - 8),
            Anchor::BottomRight,
            FontSize::Small,
            palette::DIVIDER,
        );
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_altitude() {
        assert_eq!(format_altitude(35_000).as_str(), "35k ft");
        assert_eq!(format_altitude(999).as_str(), "999 ft");
    }

    #[test]
    fn test_vertical_indicator() {
        assert_eq!(vertical_indicator(Some(500)).0, "^");
        assert_eq!(vertical_indicator(Some(-500)).0, "v");
        assert_eq!(vertical_indicator(Some(50)).0, "=");
        assert_eq!(vertical_indicator(None).0, "=");
    }
}
