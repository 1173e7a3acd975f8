//! Input events crossing into the orchestrator

use std::time::Instant;

/// A debounced, calibrated touch edge in logical pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    /// Logical X (0 = left edge)
    pub x: u16,
    /// Logical Y (0 = top edge)
    pub y: u16,
    /// `true` for a press edge
    pub pressed: bool,
    /// When the edge was detected
    pub timestamp: Instant,
}
