//! Hardware driver implementations
//!
//! This crate provides the concrete drivers the display loop talks to:
//!
//! - ILI9486 panel transport over `embedded-hal` SPI and GPIO
//! - Touch input: debounce, calibration and tap edge detection on top of a
//!   raw `TouchSensor`

#![deny(unsafe_code)]

pub mod panel;
pub mod touch;
