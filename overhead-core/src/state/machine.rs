//! State machine definition
//!
//! Screen selection is a function of the current state and an event.
//! [`ScreenMachine`] turns one tick's worth of inputs into events and keeps
//! the timers (boot splash, idle paging) the pure transition needs.

use std::time::{Duration, Instant};

use tracing::debug;

use super::events::Event;

/// Number of idle screen pages
pub const IDLE_PAGES: u8 = 3;

/// Screen states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Splash shown until the flight source reports
    Loading,
    /// Aircraft in range; `selected` indexes the candidate list
    Flight { selected: usize },
    /// Clock and weather; `page` cycles on a timer
    Idle { page: u8 },
}

impl ScreenState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }

    pub fn is_flight(&self) -> bool {
        matches!(self, ScreenState::Flight { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ScreenState::Idle { .. })
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ScreenState::Loading => "loading",
            ScreenState::Flight { .. } => "flight",
            ScreenState::Idle { .. } => "idle",
        }
    }

    /// Process an event and return the next state
    ///
    /// This is the core state transition logic.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use ScreenState::*;

        match (self, event) {
            // Loading transitions
            (Loading, Ready { candidates: 0 }) => Idle { page: 0 },
            (Loading, Ready { .. }) => Flight { selected: 0 },

            // Flight transitions
            (Flight { .. }, NoFlights) => Idle { page: 0 },
            (Flight { selected }, FlightsInRange(n)) if selected >= n => Flight { selected: 0 },
            (Flight { .. }, CandidatesChanged(_)) => Flight { selected: 0 },
            (Flight { selected }, Tap { candidates }) if candidates > 1 => Flight {
                selected: (selected + 1) % candidates,
            },

            // Idle transitions
            (Idle { .. }, FlightsInRange(_)) => Flight { selected: 0 },
            (Idle { page }, PageTimer) => Idle {
                page: (page + 1) % IDLE_PAGES,
            },

            // Default: stay in current state (taps in Idle land here)
            _ => self,
        }
    }
}

/// Inputs sampled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInput {
    /// Tick time
    pub now: Instant,
    /// The flight source has published at least one snapshot
    pub flight_reachable: bool,
    /// Aircraft in range in the fresh flight snapshot, 0 if stale or missing
    pub candidates: usize,
    /// A debounced tap edge arrived this tick
    pub tap: bool,
}

/// Timers that shape the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineTiming {
    /// Minimum time on the loading screen
    pub splash_min: Duration,
    /// Time per idle page
    pub idle_page: Duration,
}

impl Default for MachineTiming {
    fn default() -> Self {
        Self {
            splash_min: Duration::from_secs(3),
            idle_page: Duration::from_secs(5),
        }
    }
}

/// A state change produced by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ScreenState,
    pub to: ScreenState,
}

/// Screen state machine plus its timers
pub struct ScreenMachine {
    /// Current screen state
    state: ScreenState,
    timing: MachineTiming,
    /// Process start, for the splash minimum
    boot: Instant,
    /// When the current idle page went up
    page_started: Instant,
    /// Candidate count seen on the previous tick
    last_candidates: usize,
}

impl ScreenMachine {
    /// Create a machine in `Loading`
    ///
    /// # Arguments
    /// - `timing`: Splash and paging intervals
    /// - `boot`: Start of the splash period
    pub fn new(timing: MachineTiming, boot: Instant) -> Self {
        Self {
            state: ScreenState::Loading,
            timing,
            boot,
            page_started: boot,
            last_candidates: 0,
        }
    }

    /// Get current state
    pub fn state(&self) -> ScreenState {
        self.state
    }

    /// Evaluate one tick
    ///
    /// Returns the transition if the state (including the selected index or
    /// idle page) changed.
    pub fn step(&mut self, input: &TickInput) -> Option<Transition> {
        let from = self.state;
        let mut reset = false;

        if from.is_loading() {
            let splash_done = input.now.saturating_duration_since(self.boot) >= self.timing.splash_min;
            if input.flight_reachable && splash_done {
                self.apply(Event::Ready {
                    candidates: input.candidates,
                });
            }
        } else if input.candidates > 0 {
            if from.is_flight() && input.candidates != self.last_candidates {
                self.apply(Event::CandidatesChanged(input.candidates));
                reset = true;
            }
            self.apply(Event::FlightsInRange(input.candidates));
        } else {
            self.apply(Event::NoFlights);
        }

        // Taps only cycle a Flight screen that was already up with the same
        // candidate set
        if input.tap && !reset && from.is_flight() && self.state.is_flight() {
            self.apply(Event::Tap {
                candidates: input.candidates,
            });
        }

        if self.state.is_idle() {
            if !from.is_idle() {
                self.page_started = input.now;
            } else {
                self.advance_pages(input.now);
            }
        }

        self.last_candidates = input.candidates;

        if self.state != from {
            debug!(from = from.name(), to = self.state.name(), "screen transition");
            Some(Transition {
                from,
                to: self.state,
            })
        } else {
            None
        }
    }

    fn apply(&mut self, event: Event) {
        self.state = self.state.transition(event);
    }

    /// Advance the idle page by however many intervals have elapsed
    fn advance_pages(&mut self, now: Instant) {
        let interval = self.timing.idle_page;
        if interval.is_zero() {
            return;
        }
        let elapsed = now.saturating_duration_since(self.page_started);
        let steps = (elapsed.as_nanos() / interval.as_nanos()) as u32;
        if steps == 0 {
            return;
        }
        for _ in 0..steps % IDLE_PAGES as u32 {
            self.apply(Event::PageTimer);
        }
        self.page_started += interval * steps;
    }
}
