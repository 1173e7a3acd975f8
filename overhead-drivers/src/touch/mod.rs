//! Touch input handling
//!
//! `TouchInput` sits between a raw [`TouchSensor`] and the orchestrator. It
//! is polled once per tick and turns whatever samples arrived since the last
//! tick into at most one tap:
//!
//! 1. Drain pending samples (bounded per poll) and fold them into one
//!    pressed/released observation
//! 2. Debounce: a press needs `min_press_polls` consecutive pressed polls
//! 3. Edge detection: a held touch reports once until released
//! 4. Calibrate the press position into logical pixels
//!
//! Sensors that only report changes (evdev) yield nothing while a finger is
//! held still; the last known sample is then repeated so the debounce count
//! keeps advancing once per poll. A touch that goes down and up between two
//! polls is carried into the following poll as pressed, so a quick tap still
//! reaches the default two-poll threshold.

mod calibration;
mod debounce;

pub use calibration::Calibration;
pub use debounce::{Debouncer, Edge};

use std::time::Instant;

use heapless::Vec;
use tracing::{debug, trace};

use overhead_core::config::TouchConfig;
use overhead_core::geometry::Resolution;
use overhead_core::input::TouchEvent;
use overhead_hal::{RawTouch, TouchSensor};

/// Upper bound on samples consumed per poll
pub const MAX_SAMPLES_PER_POLL: usize = 32;

/// Debounced, calibrated tap source
pub struct TouchInput<S> {
    sensor: S,
    debouncer: Debouncer,
    calibration: Calibration,
    /// Last sample seen, repeated on polls with no new samples
    last: Option<RawTouch>,
    /// Last pressed sample; its position is reported on press
    contact: Option<RawTouch>,
    /// A contact ended during the previous poll
    latched: bool,
}

impl<S: TouchSensor> TouchInput<S> {
    /// Create a touch handler
    ///
    /// # Arguments
    /// - `sensor`: raw sample source
    /// - `config`: debounce threshold and calibration
    /// - `logical`: resolution tap coordinates are reported in
    pub fn new(sensor: S, config: &TouchConfig, logical: Resolution) -> Self {
        Self {
            sensor,
            debouncer: Debouncer::new(config.min_press_polls),
            calibration: Calibration::new(config, logical),
            last: None,
            contact: None,
            latched: false,
        }
    }

    /// Poll for a tap, never blocking
    ///
    /// All samples drained in one poll fold into a single pressed/released
    /// observation, so debouncing counts polls rather than samples. A read
    /// error drops this poll's samples and leaves debounce state as it was.
    pub fn poll_event(&mut self, now: Instant) -> Option<TouchEvent> {
        let mut samples: Vec<RawTouch, MAX_SAMPLES_PER_POLL> = Vec::new();
        while !samples.is_full() {
            match self.sensor.read_raw() {
                Ok(Some(raw)) => {
                    // Capacity checked by the loop condition
                    let _ = samples.push(raw);
                }
                Ok(None) => break,
                Err(e) => {
                    debug!("Touch read failed: {}", e);
                    return None;
                }
            }
        }

        let pressed_seen = samples.iter().any(|s| s.pressed);
        if let Some(contact) = samples.iter().rev().find(|s| s.pressed) {
            self.contact = Some(*contact);
        }

        let observed = if samples.is_empty() {
            self.latched || self.last.is_some_and(|l| l.pressed)
        } else {
            pressed_seen || self.latched
        };

        // A contact that ended inside this poll still counts next poll
        self.latched = pressed_seen && samples.last().is_some_and(|s| !s.pressed);
        if let Some(last) = samples.last() {
            self.last = Some(*last);
        }

        if self.debouncer.update(observed) != Some(Edge::Press) {
            return None;
        }
        let raw = self.contact?;
        let (x, y) = self.calibration.apply(&raw);
        trace!("Touch press at ({}, {}) raw ({}, {})", x, y, raw.x, raw.y);
        Some(TouchEvent {
            x,
            y,
            pressed: true,
            timestamp: now,
        })
    }

    /// Whether a finger is currently down (debounced)
    pub fn is_held(&self) -> bool {
        self.debouncer.is_held()
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}
