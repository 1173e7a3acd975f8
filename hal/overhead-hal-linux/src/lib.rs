//! Linux backends for the Overhead HAL
//!
//! This crate provides Linux implementations of the `overhead-hal` traits
//! plus board bring-up for the SPI panel:
//!
//! - `LinuxBoard`: spidev bus and sysfs GPIO lines, opened once and split
//!   into owned parts
//! - `EvdevTouch`: non-blocking `/dev/input/eventN` touch sensor
//! - `FbdevSink`: `/dev/fbN` framebuffer for the HDMI mirror
//! - `local_ip`: the address shown on the loading screen

#![deny(unsafe_code)]

pub mod board;
pub mod evdev;
pub mod fbdev;
pub mod gpio;
pub mod net;

pub use board::{BoardConfig, BoardError, LineConfig, LinuxBoard};
pub use evdev::EvdevTouch;
pub use fbdev::{hide_console_cursor, FbdevSink};
pub use gpio::OutputLine;
pub use net::local_ip;

// Bus and delay types handed out by `LinuxBoard`
pub use linux_embedded_hal::{Delay, SpidevDevice};
