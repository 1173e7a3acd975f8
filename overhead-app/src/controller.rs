//! Display controller
//!
//! The controller is the per-tick brain of the display:
//! - Polls touch for a tap
//! - Classifies snapshot freshness and steps the screen state machine
//! - Renders the active screen into the logical frame
//! - Pushes the frame to the panel, then to the HDMI mirror
//!
//! It owns every output device by value and is driven from a single thread,
//! so a tick can never interleave with another.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use tracing::{debug, error, info, warn};

use overhead_core::data::{FlightSnapshot, Freshness, Watchlist, WeatherSnapshot};
use overhead_core::state::{MachineTiming, ScreenMachine, ScreenState, TickInput, Transition};
use overhead_display::{
    ConvertError, DisplayBackend, FlightView, FrameConverter, IdleView, LoadingStatus,
    LoadingView, LogicalFrame, Scene, Screen, WeatherView,
};
use overhead_drivers::touch::TouchInput;
use overhead_hal::{Framebuffer, TouchSensor};

use crate::mirror::Mirror;

/// Static inputs to the controller
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub radius_km: f64,
    pub location: String,
    pub watchlist: Watchlist,
    pub flight_max_age: Duration,
    pub weather_max_age: Duration,
    pub timing: MachineTiming,
}

/// Everything sampled at the start of a tick
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub now: Instant,
    /// Local wall-clock time for the idle screen
    pub wall_clock: NaiveDateTime,
    pub flights: Option<&'a FlightSnapshot>,
    pub weather: Option<&'a WeatherSnapshot>,
    pub local_ip: Option<IpAddr>,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub transition: Option<Transition>,
    pub tapped: bool,
    /// Panel accepted the frame
    pub panel_ok: bool,
    /// Mirror accepted the frame; `false` when no mirror is attached
    pub mirrored: bool,
}

/// Display controller
pub struct Controller<P, S, F> {
    settings: ControllerSettings,
    machine: ScreenMachine,
    converter: FrameConverter,
    frame: LogicalFrame,
    panel: P,
    touch: Option<TouchInput<S>>,
    mirror: Option<Mirror<F>>,
    /// Consecutive panel write failures
    panel_failures: u32,
    last_scene: Option<Scene>,
}

impl<P, S, F> Controller<P, S, F>
where
    P: DisplayBackend,
    S: TouchSensor,
    F: Framebuffer,
{
    /// Create a controller in the loading state
    ///
    /// # Arguments
    /// - `converter`: logical-to-panel transform; its device resolution must
    ///   match the panel
    /// - `boot`: start of the splash period
    pub fn new(
        settings: ControllerSettings,
        converter: FrameConverter,
        panel: P,
        touch: Option<TouchInput<S>>,
        mirror: Option<Mirror<F>>,
        boot: Instant,
    ) -> Self {
        Self {
            machine: ScreenMachine::new(settings.timing, boot),
            frame: LogicalFrame::new(converter.logical()),
            settings,
            converter,
            panel,
            touch,
            mirror,
            panel_failures: 0,
            last_scene: None,
        }
    }

    pub fn state(&self) -> ScreenState {
        self.machine.state()
    }

    pub fn panel_failures(&self) -> u32 {
        self.panel_failures
    }

    /// Scene drawn on the most recent tick
    pub fn last_scene(&self) -> Option<&Scene> {
        self.last_scene.as_ref()
    }

    pub fn frame(&self) -> &LogicalFrame {
        &self.frame
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Run one tick
    pub fn tick(&mut self, ctx: &TickContext<'_>) -> TickReport {
        let tapped = self
            .touch
            .as_mut()
            .and_then(|t| t.poll_event(ctx.now))
            .is_some();

        let flights = ctx.flights.filter(|snapshot| {
            Freshness::classify(Some(snapshot.fetched_at), ctx.now, self.settings.flight_max_age)
                .is_fresh()
        });
        let input = TickInput {
            now: ctx.now,
            flight_reachable: ctx.flights.is_some(),
            candidates: flights.map_or(0, |s| s.candidates()),
            tap: tapped,
        };
        let transition = self.machine.step(&input);
        if let Some(t) = transition {
            if t.from.name() != t.to.name() {
                info!("Screen {} -> {}", t.from.name(), t.to.name());
            }
        }

        let scene = self.scene(ctx, flights);
        scene
            .rasterize(&mut self.frame)
            .unwrap_or_else(|never| match never {});
        self.last_scene = Some(scene);

        let panel_ok = self.present_panel();
        let mirrored = match self.mirror.as_mut() {
            Some(mirror) => mirror.write(&self.frame),
            None => false,
        };

        TickReport {
            transition,
            tapped,
            panel_ok,
            mirrored,
        }
    }

    /// Build the scene for the current state
    fn scene(&self, ctx: &TickContext<'_>, fresh_flights: Option<&FlightSnapshot>) -> Scene {
        let resolution = self.frame.resolution();
        let screen = match self.machine.state() {
            ScreenState::Loading => Screen::Loading(LoadingView {
                status: loading_status(ctx),
                ip: ctx.local_ip,
            }),
            ScreenState::Flight { selected } => match fresh_flights.filter(|s| !s.is_empty()) {
                Some(snapshot) => {
                    let index = selected.min(snapshot.candidates() - 1);
                    let aircraft = &snapshot.aircraft[index];
                    Screen::Flight(FlightView {
                        aircraft,
                        index,
                        count: snapshot.candidates(),
                        radius_km: self.settings.radius_km,
                        watch: aircraft
                            .registration
                            .as_deref()
                            .and_then(|r| self.settings.watchlist.lookup(r)),
                    })
                }
                None => self.idle_screen(ctx, 0),
            },
            ScreenState::Idle { page } => self.idle_screen(ctx, page),
        };
        screen.scene(resolution)
    }

    fn idle_screen<'a>(&'a self, ctx: &TickContext<'a>, page: u8) -> Screen<'a> {
        let weather = match ctx.weather {
            None => WeatherView::Missing,
            Some(snapshot) => {
                match Freshness::classify(Some(snapshot.fetched_at), ctx.now, self.settings.weather_max_age) {
                    Freshness::Fresh => WeatherView::Fresh(&snapshot.report),
                    _ => WeatherView::Stale,
                }
            }
        };
        Screen::Idle(IdleView {
            now: ctx.wall_clock,
            weather,
            page,
            location: &self.settings.location,
        })
    }

    /// Convert and write the frame to the panel
    fn present_panel(&mut self) -> bool {
        let device = match self.converter.convert(&self.frame) {
            Ok(device) => device,
            Err(ConvertError::DimensionMismatch { expected, actual }) => {
                error!("Rendered frame is {}, expected {}", actual, expected);
                debug_assert!(false, "renderer produced a {} frame", actual);
                let fitted = self.frame.fit_to(expected);
                match self.converter.convert(&fitted) {
                    Ok(device) => device,
                    Err(_) => return false,
                }
            }
        };

        match self.panel.write_frame(&device) {
            Ok(()) => {
                if self.panel_failures > 0 {
                    info!("Panel recovered after {} failed writes", self.panel_failures);
                }
                self.panel_failures = 0;
                true
            }
            Err(e) => {
                self.panel_failures += 1;
                warn!(
                    "Panel write failed ({} consecutive): {}",
                    self.panel_failures, e
                );
                false
            }
        }
    }

    /// Blank the panel and switch the backlight off
    pub fn shutdown(&mut self) -> Result<(), P::Error> {
        debug!("Controller shutting down in state {}", self.machine.state().name());
        self.panel.shutdown()
    }
}

/// Loading line for whichever collaborators have not reported yet
fn loading_status(ctx: &TickContext<'_>) -> LoadingStatus {
    match (ctx.flights.is_some(), ctx.weather.is_some()) {
        (false, false) => LoadingStatus::Initializing,
        (_, false) => LoadingStatus::FetchingWeather,
        (_, true) => LoadingStatus::ScanningFlights,
    }
}
