//! Render loop
//!
//! Runs on a dedicated blocking thread. Each iteration samples the snapshot
//! slots, runs one controller tick, then sleeps out the rest of the period.
//! On shutdown the in-flight tick completes before the panel is blanked.

use std::net::IpAddr;
use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, info, trace};

use overhead_display::DisplayBackend;
use overhead_hal::{Framebuffer, TouchSensor};

use crate::channels::Snapshots;
use crate::controller::{Controller, TickContext};

/// How often the local address is re-resolved
const IP_REFRESH: Duration = Duration::from_secs(10);

/// Fixed-period tick scheduler
///
/// An overrun starts the next tick immediately and re-bases the schedule
/// instead of bursting to catch up.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    period: Duration,
    next: Instant,
}

impl Pacer {
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next: start,
        }
    }

    /// Time to sleep before the next tick, given the current time
    pub fn delay(&mut self, now: Instant) -> Duration {
        self.next += self.period;
        if self.next > now {
            self.next - now
        } else {
            trace!("Tick overran by {:?}", now - self.next);
            self.next = now;
            Duration::ZERO
        }
    }
}

/// Drive the controller until shutdown is signalled
///
/// # Arguments
/// - `period`: tick interval
/// - `resolve_ip`: local address lookup, re-run every few seconds
pub fn run_render_loop<P, S, F>(
    mut controller: Controller<P, S, F>,
    snapshots: Snapshots,
    shutdown: watch::Receiver<bool>,
    period: Duration,
    mut resolve_ip: impl FnMut() -> Option<IpAddr>,
) -> Result<(), P::Error>
where
    P: DisplayBackend,
    S: TouchSensor,
    F: Framebuffer,
{
    info!("Render loop started, {} ms per tick", period.as_millis());
    let mut pacer = Pacer::new(period, Instant::now());
    let mut local_ip = resolve_ip();
    let mut ip_checked = Instant::now();
    let mut ticks = 0u64;

    while !*shutdown.borrow() {
        let now = Instant::now();
        if now.duration_since(ip_checked) >= IP_REFRESH {
            local_ip = resolve_ip();
            ip_checked = now;
        }

        let flights = snapshots.flights();
        let weather = snapshots.weather();
        let ctx = TickContext {
            now,
            wall_clock: chrono::Local::now().naive_local(),
            flights: flights.as_deref(),
            weather: weather.as_deref(),
            local_ip,
        };
        let report = controller.tick(&ctx);
        ticks += 1;
        trace!("Tick {}: {:?}", ticks, report);

        thread::sleep(pacer.delay(Instant::now()));
    }

    debug!("Render loop stopping after {} ticks", ticks);
    controller.shutdown()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacer_sleeps_remainder() {
        let start = Instant::now();
        let mut pacer = Pacer::new(Duration::from_millis(100), start);
        let delay = pacer.delay(start + Duration::from_millis(30));
        assert_eq!(delay, Duration::from_millis(70));
        let delay = pacer.delay(start + Duration::from_millis(110));
        assert_eq!(delay, Duration::from_millis(90));
    }

    #[test]
    fn test_pacer_overrun_rebases() {
        let start = Instant::now();
        let mut pacer = Pacer::new(Duration::from_millis(100), start);

        // One long tick
        assert_eq!(pacer.delay(start + Duration::from_millis(350)), Duration::ZERO);
        // No burst afterwards: the next tick is a full period later
        assert_eq!(
            pacer.delay(start + Duration::from_millis(360)),
            Duration::from_millis(90)
        );
    }
}
