//! Overhead flight display
//!
//! Entry point for the display service. Wires the configured SPI panel,
//! touch screen and HDMI mirror into a controller, starts the feed tasks and
//! runs the render loop until SIGINT/SIGTERM (or the end of the demo script).
//!
//! # Tasks
//!
//! - Render loop (blocking thread): touch, state machine, panel, mirror
//! - Flight feed: polls the flight spool and publishes snapshots
//! - Weather feed: polls the weather spool and publishes snapshots
//! - Demo script (`--test` only): ends the run

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use overhead_core::config::Config;
use overhead_display::FrameConverter;
use overhead_drivers::panel::Ili9486;
use overhead_drivers::touch::TouchInput;
use overhead_hal_linux::{
    hide_console_cursor, local_ip, Delay, EvdevTouch, FbdevSink, LinuxBoard, OutputLine, SpidevDevice,
};

use overhead_app::channels::{shutdown_channel, snapshot_channels, Publishers};
use overhead_app::config;
use overhead_app::controller::{Controller, ControllerSettings};
use overhead_app::demo::{self, DemoFlightFeed, DemoSchedule, DemoWeatherFeed};
use overhead_app::feeds::{SpoolFlightFeed, SpoolWeatherFeed};
use overhead_app::mirror;
use overhead_app::tasks::{self, FlightFeedSettings, Stop};

/// Feed tasks get this long to stop before they are abandoned
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Overhead flight display for SPI TFT panels
#[derive(Debug, Parser)]
#[command(name = "overhead", version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "overhead.toml")]
    config: PathBuf,

    /// Run a short scripted demo with sample data
    #[arg(long)]
    test: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let boot = Instant::now();
    info!("Overhead v{} starting", env!("CARGO_PKG_VERSION"));

    let config = config::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    let controller = build_controller(&config, boot)?;

    let (publishers, snapshots) = snapshot_channels();
    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    let mut feeds = JoinSet::new();
    spawn_feeds(&mut feeds, &config, &args, boot, publishers, &shutdown_tx, &shutdown_rx);

    let tick = config.display.timing.tick();
    let render_shutdown = shutdown_rx.clone();
    let mut render = tokio::task::spawn_blocking(move || {
        tasks::run_render_loop(controller, snapshots, render_shutdown, tick, local_ip)
    });

    let stop = tasks::wait_for_stop(&mut render, shutdown_rx.clone(), termination())
        .await
        .context("Failed to install signal handlers")?;
    let _ = shutdown_tx.send(true);

    let (outcome, early) = match stop {
        Stop::Signal => {
            info!("Shutdown requested");
            (render.await, false)
        }
        Stop::Flag => (render.await, false),
        Stop::RenderExited(res) => {
            error!("Render loop exited before shutdown was requested");
            (res, true)
        }
    };
    match outcome.context("Render thread panicked")? {
        Ok(()) => info!("Display blanked"),
        Err(e) => warn!("Panel shutdown failed: {}", e),
    }

    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while feeds.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        warn!("Feed tasks did not stop within {:?}, abandoning", SHUTDOWN_GRACE);
        feeds.abort_all();
    }

    anyhow::ensure!(!early, "Render loop stopped unexpectedly");
    info!("Goodbye");
    Ok(())
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves on SIGINT or SIGTERM
async fn termination() -> std::io::Result<()> {
    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = term.recv() => Ok(()),
    }
}

type Panel = Ili9486<SpidevDevice, OutputLine, OutputLine, OutputLine, Delay>;

/// Open and initialize every output device
///
/// The panel is mandatory; touch and the HDMI mirror degrade to disabled.
fn build_controller(config: &Config, boot: Instant) -> Result<Controller<Panel, EvdevTouch, FbdevSink>> {
    let board = LinuxBoard::open(&config::board_config(config)).context("Failed to open display bus")?;
    let LinuxBoard {
        spi,
        dc,
        reset,
        backlight,
        delay,
    } = board;

    let mut panel = Ili9486::new(spi, dc, reset, backlight, delay, config::panel_settings(config))
        .context("Invalid panel settings")?;
    panel.init().context("Panel initialization failed")?;
    info!("Panel ready: {}", config.display.panel.resolution());

    let logical = config.display.logical();
    let touch = if config.touch.enabled {
        match EvdevTouch::open_or_discover(config.touch.device.as_deref()) {
            Ok(sensor) => {
                info!("Touch input on {}", sensor.path().display());
                Some(TouchInput::new(sensor, &config.touch, logical))
            }
            Err(e) => {
                warn!("Touch input unavailable, continuing without it: {}", e);
                None
            }
        }
    } else {
        None
    };

    let mirror = if config.display.mirror_hdmi {
        mirror::attach(FbdevSink::open(&config.display.mirror_device), hide_console_cursor)
    } else {
        None
    };

    let settings = ControllerSettings {
        radius_km: config.flight_radius_km,
        location: config.location.name.to_string(),
        watchlist: config.watchlist.clone(),
        flight_max_age: config.flight_max_age(),
        weather_max_age: config.weather_max_age(),
        timing: config::machine_timing(config),
    };
    let converter = FrameConverter::new(logical, config.display.rotation, panel.settings().format);
    anyhow::ensure!(
        converter.device_resolution() == panel.settings().resolution,
        "Logical {} rotated {} does not cover the {} panel",
        logical,
        config.display.rotation.degrees(),
        panel.settings().resolution
    );

    Ok(Controller::new(settings, converter, panel, touch, mirror, boot))
}

fn spawn_feeds(
    feeds: &mut JoinSet<()>,
    config: &Config,
    args: &Args,
    boot: Instant,
    publishers: Publishers,
    shutdown_tx: &tokio::sync::watch::Sender<bool>,
    shutdown_rx: &tokio::sync::watch::Receiver<bool>,
) {
    let Publishers { flights, weather } = publishers;
    let mut flight_settings = FlightFeedSettings {
        observer: config.location.position(),
        radius_km: config.flight_radius_km,
        interval: config.flight_update_interval(),
    };

    if args.test {
        info!("Demo mode: synthetic flight and weather data");
        let schedule = DemoSchedule::new(
            tokio::time::Instant::from_std(boot),
            config.display.timing.splash_min(),
        );
        flight_settings.interval = Duration::from_secs(1);
        feeds.spawn(tasks::run_flight_feed(
            DemoFlightFeed::new(flight_settings.observer, schedule.clear_at),
            flight_settings,
            flights,
            shutdown_rx.clone(),
        ));
        feeds.spawn(tasks::run_weather_feed(
            DemoWeatherFeed,
            config.weather_update_interval(),
            weather,
            shutdown_rx.clone(),
        ));
        feeds.spawn(demo::run_script(schedule, shutdown_tx.clone()));
    } else {
        feeds.spawn(tasks::run_flight_feed(
            SpoolFlightFeed::new(&config.feeds.flights_spool),
            flight_settings,
            flights,
            shutdown_rx.clone(),
        ));
        feeds.spawn(tasks::run_weather_feed(
            SpoolWeatherFeed::new(&config.feeds.weather_spool),
            config.weather_update_interval(),
            weather,
            shutdown_rx.clone(),
        ));
    }
}
