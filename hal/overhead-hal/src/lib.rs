//! Overhead Hardware Abstraction Layer
//!
//! This crate defines the capability traits the display core needs from a
//! board, so the same orchestration code runs against real Linux devices or
//! against test doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (overhead-app)             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  overhead-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ overhead-hal- │
//!             │     linux     │
//!             └───────────────┘
//! ```
//!
//! The SPI bus and GPIO lines themselves are expressed with `embedded-hal`
//! 1.0 traits; this crate only adds what `embedded-hal` does not cover.
//!
//! # Traits
//!
//! - [`touch::TouchSensor`] - Raw touch panel sampling
//! - [`framebuffer::Framebuffer`] - Linear framebuffer sink (HDMI mirror)

#![deny(unsafe_code)]

pub mod bus;
pub mod framebuffer;
pub mod touch;

// Re-export key types at crate root for convenience
pub use bus::{BusConfig, Mode};
pub use framebuffer::{ByteOrder, Framebuffer, FramebufferError, FramebufferInfo};
pub use touch::{RawTouch, TouchReadError, TouchSensor};
