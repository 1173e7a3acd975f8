//! Display backend trait
//!
//! Defines the interface the render loop drives. The panel driver is the
//! production implementation; tests substitute recorders.

use overhead_core::geometry::Resolution;

use crate::convert::{DeviceFrame, PixelFormat};

/// Display backend trait
///
/// Provides a hardware-agnostic interface for pushing whole frames to a
/// display that has already been initialized.
pub trait DisplayBackend {
    /// Error type for display operations
    type Error: core::fmt::Display;

    /// Native resolution, in the controller's scan order
    fn resolution(&self) -> Resolution;

    /// Encoding the display expects
    fn format(&self) -> PixelFormat;

    /// Replace the displayed image
    ///
    /// On error the display keeps whatever it last showed.
    fn write_frame(&mut self, frame: &DeviceFrame) -> Result<(), Self::Error>;

    /// Switch the backlight, if controllable
    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Blank the display and put the controller to sleep
    fn shutdown(&mut self) -> Result<(), Self::Error>;
}
