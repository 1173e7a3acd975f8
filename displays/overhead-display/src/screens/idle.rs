//! Idle screen: clock, date and weather

use chrono::NaiveDateTime;
use embedded_graphics::prelude::*;

use overhead_core::data::WeatherReport;
use overhead_core::geometry::Resolution;
use overhead_core::state::IDLE_PAGES;

use super::theme::{palette, temperature_color};
use super::PLACEHOLDER;
use crate::scene::{Anchor, FontSize, Scene};

/// Weather as the idle screen sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeatherView<'a> {
    /// Report within its freshness window
    Fresh(&'a WeatherReport),
    /// A report exists but is too old to trust; fields show placeholders
    Stale,
    /// Nothing received yet
    Missing,
}

/// Inputs for the idle screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleView<'a> {
    /// Local wall-clock time
    pub now: NaiveDateTime,
    pub weather: WeatherView<'a>,
    /// Detail page, wraps modulo the page count
    pub page: u8,
    pub location: &'a str,
}

/// Formats a value from the fresh report, or the placeholder when stale
fn field(report: Option<&WeatherReport>, f: impl FnOnce(&WeatherReport) -> String) -> String {
    match report {
        Some(r) => f(r),
        None => PLACEHOLDER.to_string(),
    }
}

impl IdleView<'_> {
    pub(crate) fn scene(&self, res: Resolution) -> Scene {
        let (w, h) = (res.width as i32, res.height as i32);
        let cx = w / 2;
        let mut scene = Scene::new();
        scene.clear(palette::BACKGROUND);

        scene.text(
            self.now.format("%H:%M").to_string(),
            Point::new(cx, 25),
            Anchor::TopCenter,
            FontSize::Huge,
            palette::TEXT,
        );
        scene.text(
            self.now.format("%A, %B %d").to_string(),
            Point::new(cx, 90),
            Anchor::TopCenter,
            FontSize::Medium,
            palette::ACCENT,
        );
        scene.hline(50, w - 50, 125, palette::DIVIDER);

        let report = match self.weather {
            WeatherView::Fresh(r) => Some(r),
            WeatherView::Stale => None,
            WeatherView::Missing => {
                scene.text(
                    "Weather unavailable",
                    Point::new(cx, 170),
                    Anchor::TopCenter,
                    FontSize::Medium,
                    palette::SECONDARY,
                );
                scene.text(
                    self.location,
                    Point::new(cx, 210),
                    Anchor::TopCenter,
                    FontSize::Small,
                    palette::SECONDARY,
                );
                self.footer(&mut scene, h);
                return scene;
            }
        };

        let temp_color = report.map_or(palette::SECONDARY, |r| temperature_color(r.temperature_c));
        scene.text(
            format!("{}\u{b0}C", field(report, |r| format!("{:.1}", r.temperature_c))),
            Point::new(cx, 135),
            Anchor::TopCenter,
            FontSize::Large,
            temp_color,
        );
        scene.text(
            field(report, |r| r.description().to_string()),
            Point::new(cx, 185),
            Anchor::TopCenter,
            FontSize::Medium,
            palette::SECONDARY,
        );

        let wind = format!(
            "Wind: {} {} km/h",
            field(report, |r| r.wind_compass().to_string()),
            field(report, |r| format!("{:.0}", r.wind_speed_kmh))
        );
        let (left, right) = (Point::new(30, 235), Point::new(w - 30, 235));
        match self.page % IDLE_PAGES {
            0 => {
                scene.text(
                    format!("Feels like {}\u{b0}C", field(report, |r| format!("{:.1}", r.feels_like_c))),
                    Point::new(cx, 212),
                    Anchor::TopCenter,
                    FontSize::Small,
                    palette::SECONDARY,
                );
                scene.text(wind, left, Anchor::TopLeft, FontSize::Small, palette::SECONDARY);
                scene.text(
                    format!("Humidity: {}%", field(report, |r| r.humidity.to_string())),
                    right,
                    Anchor::TopRight,
                    FontSize::Small,
                    palette::SECONDARY,
                );
            }
            1 => {
                scene.text(
                    format!(
                        "High: {}\u{b0}C  Low: {}\u{b0}C",
                        field(report, |r| format!("{:.0}", r.temp_max_c)),
                        field(report, |r| format!("{:.0}", r.temp_min_c))
                    ),
                    Point::new(cx, 212),
                    Anchor::TopCenter,
                    FontSize::Small,
                    palette::SECONDARY,
                );
                scene.text(
                    format!("Precip: {} mm", field(report, |r| format!("{:.1}", r.precipitation_mm))),
                    left,
                    Anchor::TopLeft,
                    FontSize::Small,
                    palette::ACCENT,
                );
                scene.text(
                    format!("Pressure: {} hPa", field(report, |r| format!("{:.0}", r.pressure_hpa))),
                    right,
                    Anchor::TopRight,
                    FontSize::Small,
                    palette::SECONDARY,
                );
            }
            _ => {
                scene.text(wind, Point::new(30, 212), Anchor::TopLeft, FontSize::Small, palette::SECONDARY);
                scene.text(
                    format!("Gusts: {} km/h", field(report, |r| format!("{:.0}", r.wind_gusts_kmh))),
                    Point::new(w - 30, 212),
                    Anchor::TopRight,
                    FontSize::Small,
                    palette::SECONDARY,
                );
                let sunrise = report.and_then(|r| r.sunrise.as_deref()).unwrap_or(PLACEHOLDER);
                let sunset = report.and_then(|r| r.sunset.as_deref()).unwrap_or(PLACEHOLDER);
                scene.text(
                    format!("Sunrise: {}", sunrise),
                    left,
                    Anchor::TopLeft,
                    FontSize::Small,
                    palette::TEMP_WARM,
                );
                scene.text(
                    format!("Sunset: {}", sunset),
                    right,
                    Anchor::TopRight,
                    FontSize::Small,
                    palette::ACCENT,
                );
            }
        }

        scene.text(
            format!("{}  [{}/{}]", self.location, self.page % IDLE_PAGES + 1, IDLE_PAGES),
            Point::new(cx, 265),
            Anchor::TopCenter,
            FontSize::Small,
            palette::SECONDARY,
        );
        self.footer(&mut scene, h);
        scene
    }

    fn footer(&self, scene: &mut Scene, h: i32) {
        scene.text(
            "Scanning for flights...",
            Point::new(10, h - 20),
            Anchor::TopLeft,
            FontSize::Small,
            palette::DIVIDER,
        );
    }
}
