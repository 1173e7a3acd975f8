//! Touch sensor abstraction
//!
//! A touch sensor yields raw samples in its own coordinate space. Debounce,
//! calibration and edge detection live above this trait.

use thiserror::Error;

/// One raw touch sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawTouch {
    /// Raw X reading (sensor units)
    pub x: u16,
    /// Raw Y reading (sensor units)
    pub y: u16,
    /// Whether the panel reports contact
    pub pressed: bool,
}

/// Touch read errors
///
/// All of these are transient from the caller's point of view: the sample
/// is dropped and the next poll tries again.
#[derive(Debug, Error)]
pub enum TouchReadError {
    /// Device read failed
    #[error("touch device read failed: {0}")]
    Io(#[from] std::io::Error),
    /// Device returned a malformed record
    #[error("malformed touch record")]
    Malformed,
}

/// Touch sensor
///
/// Implementations must never block. Sensors that report asynchronously
/// (evdev) queue their samples and hand them out one per call; sensors that
/// are sampled on demand (ADC) return a fresh reading on every call.
pub trait TouchSensor {
    /// Read the next raw sample
    ///
    /// Returns `Ok(None)` when no sample arrived since the previous call.
    fn read_raw(&mut self) -> Result<Option<RawTouch>, TouchReadError>;
}

impl<T: TouchSensor + ?Sized> TouchSensor for Box<T> {
    fn read_raw(&mut self) -> Result<Option<RawTouch>, TouchReadError> {
        (**self).read_raw()
    }
}
