//! Configuration types
//!
//! Strongly typed settings loaded once at startup and treated as immutable
//! for the life of the process. Every field has a default so a partial
//! file (or no file at all) still yields a usable configuration.

pub mod display;
pub mod types;

pub use display::*;
pub use types::*;
