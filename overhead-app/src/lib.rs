//! Overhead flight display service
//!
//! Everything the `overhead` binary wires together:
//!
//! - `config`: TOML loading and mapping onto driver parameters
//! - `channels`: snapshot slots and the shutdown flag
//! - `feeds`: spool file feeds for live mode
//! - `demo`: synthetic feeds and the `--test` script
//! - `controller`: per-tick orchestration of touch, screens, panel and mirror
//! - `mirror`: HDMI framebuffer output
//! - `tasks`: the feed tasks and the blocking render loop

#![deny(unsafe_code)]

pub mod channels;
pub mod config;
pub mod controller;
pub mod demo;
pub mod feeds;
pub mod mirror;
pub mod tasks;
