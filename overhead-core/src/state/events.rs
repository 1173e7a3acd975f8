//! State machine events
//!
//! Events are derived from each tick's inputs by [`super::ScreenMachine`]
//! and applied in priority order.

/// Events that drive screen transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Splash time elapsed and the flight source has reported at least once
    Ready {
        /// Aircraft in range in the fresh snapshot (0 when stale)
        candidates: usize,
    },
    /// Fresh snapshot holds this many aircraft in range (at least one)
    FlightsInRange(usize),
    /// No fresh aircraft in range
    NoFlights,
    /// Number of candidates differs from the previous tick
    CandidatesChanged(usize),
    /// Debounced tap
    Tap {
        /// Aircraft in range when the tap landed
        candidates: usize,
    },
    /// Idle page interval elapsed
    PageTimer,
}
