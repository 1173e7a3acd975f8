//! Configuration loading and hardware mapping
//!
//! The typed configuration lives in `overhead_core::config`; this module
//! reads it from disk and turns it into the parameter structs the drivers
//! take.

mod hardware;
mod loader;

pub use hardware::{board_config, machine_timing, panel_settings};
pub use loader::{load, parse_config, LoadError};
