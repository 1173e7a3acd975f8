//! Board-agnostic core logic for the flight display
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Configuration type definitions and validation
//! - Display geometry (resolution, rotation)
//! - Flight and weather snapshot data model
//! - Watchlist matching
//! - Screen state machine

#![deny(unsafe_code)]

pub mod config;
pub mod data;
pub mod geo;
pub mod geometry;
pub mod input;
pub mod state;
