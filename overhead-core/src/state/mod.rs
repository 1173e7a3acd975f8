//! Screen state machine
//!
//! Decides which screen is on the panel. The state machine is explicit,
//! finite, and deterministic: the next state depends only on the current
//! state, the flight data, a tap, and elapsed time.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{MachineTiming, ScreenMachine, ScreenState, TickInput, Transition, IDLE_PAGES};
