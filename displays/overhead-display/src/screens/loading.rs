//! Loading splash

use std::net::IpAddr;

use embedded_graphics::prelude::*;

use overhead_core::geometry::Resolution;

use super::theme::palette;
use crate::scene::{Anchor, DrawOp, FontSize, Scene};

/// What startup is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingStatus {
    Initializing,
    FetchingWeather,
    ScanningFlights,
}

impl LoadingStatus {
    pub fn text(self) -> &'static str {
        match self {
            LoadingStatus::Initializing => "Initializing...",
            LoadingStatus::FetchingWeather => "Fetching weather...",
            LoadingStatus::ScanningFlights => "Scanning for flights...",
        }
    }
}

/// Inputs for the loading screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingView {
    pub status: LoadingStatus,
    /// Local address, `None` when offline
    pub ip: Option<IpAddr>,
}

const LOGO_SIZE: u32 = 60;

impl LoadingView {
    pub(crate) fn scene(&self, res: Resolution) -> Scene {
        let (w, h) = (res.width as i32, res.height as i32);
        let cx = w / 2;
        let mut scene = Scene::new();
        scene.clear(palette::BACKGROUND);

        // Logo with radar rings
        let logo = Point::new(cx, 80);
        for extra in [10, 25, 40] {
            scene.push(DrawOp::Circle {
                center: logo,
                diameter: (LOGO_SIZE + extra) * 2,
                color: palette::DIVIDER,
                stroke: 1,
            });
        }
        scene.push(DrawOp::Plane {
            center: logo,
            size: LOGO_SIZE,
            heading: 0,
            color: palette::ACCENT,
        });

        scene.text(
            "Flight Tracker",
            Point::new(cx, 160),
            Anchor::TopCenter,
            FontSize::Large,
            palette::TEXT,
        );
        scene.text(
            self.status.text(),
            Point::new(cx, 210),
            Anchor::TopCenter,
            FontSize::Medium,
            palette::ACCENT,
        );
        scene.hline(100, w - 100, 245, palette::DIVIDER);
        scene.text(
            "Raspberry Pi Flight Display",
            Point::new(cx, 260),
            Anchor::TopCenter,
            FontSize::Small,
            palette::SECONDARY,
        );

        let ip = match self.ip {
            Some(ip) => ip.to_string(),
            None => "No network".to_string(),
        };
        scene.text(
            ip,
            Point::new(w - 10, h - 10),
            Anchor::BottomRight,
            FontSize::Small,
            palette::SECONDARY,
        );
        scene
    }
}
