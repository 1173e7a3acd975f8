//! Frame pipeline and screens for the flight display
//!
//! This crate provides:
//! - `LogicalFrame`, the RGB888 canvas screens draw into
//! - `FrameConverter`, the pure transform to bus-native `DeviceFrame`s
//! - `letterbox`, the aspect-preserving scale used for the HDMI mirror
//! - `Scene`, a list of positioned draw operations, and its rasterizer
//! - `Screen`, the Loading / Flight / Idle renderers
//! - `DisplayBackend` trait for anything that accepts device frames
//!
//! # Architecture
//!
//! ```text
//! Screen ──scene()──▶ Scene ──rasterize──▶ LogicalFrame
//!                                              │
//!                 ┌────────────────────────────┴──────────┐
//!                 ▼                                       ▼
//!          FrameConverter                            letterbox
//!                 │                                       │
//!                 ▼                                       ▼
//!       DeviceFrame ──▶ DisplayBackend (panel)   DeviceFrame ──▶ HDMI
//! ```

#![deny(unsafe_code)]

pub mod backend;
pub mod convert;
pub mod frame;
pub mod scene;
pub mod screens;

// Re-export key types
pub use backend::DisplayBackend;
pub use convert::{letterbox, ConvertError, DeviceFrame, FrameConverter, PixelFormat};
pub use frame::LogicalFrame;
pub use scene::{Anchor, DrawOp, FontSize, Scene};
pub use screens::{FlightView, IdleView, LoadingStatus, LoadingView, Screen, WeatherView, PLACEHOLDER};
