//! Display hardware configuration
//!
//! Panel geometry, SPI bus, GPIO control lines and loop timing.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::ConfigError;
use crate::geometry::{Resolution, Rotation};

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO line number (BCM numbering on the Pi)
    pub pin: u32,
    /// Pin is active-low (inverted)
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u32) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u32) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// Panel control lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinsConfig {
    /// Data/command select
    pub dc: PinConfig,
    /// Controller reset (active-low pulse)
    pub reset: PinConfig,
    /// Backlight enable, if the board wires one
    pub backlight: Option<PinConfig>,
}

impl Default for PinsConfig {
    fn default() -> Self {
        // MHS35 / Waveshare 3.5" (A) wiring
        Self {
            dc: PinConfig::new(24),
            reset: PinConfig::new(25),
            backlight: None,
        }
    }
}

/// Bus-native color depth of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PanelPixelFormat {
    /// 16-bit 5-6-5, two bytes per pixel
    #[default]
    Rgb565,
    /// 18-bit 6-6-6, three bytes per pixel
    Rgb666,
}

/// Panel controller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    /// Native width in the controller's scan order
    pub width: u32,
    /// Native height in the controller's scan order
    pub height: u32,
    /// Interface pixel format
    pub pixel_format: PanelPixelFormat,
    /// Memory access control byte (scan direction, BGR)
    pub madctl: u8,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 480,
            pixel_format: PanelPixelFormat::Rgb565,
            madctl: 0x48, // MX | BGR, portrait
        }
    }
}

impl PanelConfig {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }
}

/// SPI bus settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpiConfig {
    /// spidev node
    pub device: String,
    /// Clock frequency in Hz
    pub frequency_hz: u32,
    /// SPI mode 0-3
    pub mode: u8,
    /// Largest single transfer in bytes (spidev `bufsiz`)
    pub max_transfer: usize,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            device: "/dev/spidev0.0".into(),
            frequency_hz: 16_000_000,
            mode: 0,
            max_transfer: 4096,
        }
    }
}

/// Loop and screen timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Render loop period in milliseconds
    pub tick_ms: u64,
    /// Seconds each idle page stays up
    pub idle_page_seconds: u64,
    /// Minimum time the loading screen stays up
    pub splash_min_seconds: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            idle_page_seconds: 5,
            splash_min_seconds: 3,
        }
    }
}

impl TimingConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn idle_page(&self) -> Duration {
        Duration::from_secs(self.idle_page_seconds)
    }

    pub fn splash_min(&self) -> Duration {
        Duration::from_secs(self.splash_min_seconds)
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// Logical frame width
    pub width: u32,
    /// Logical frame height
    pub height: u32,
    /// Rotation from logical frame to panel
    pub rotation: Rotation,
    /// Duplicate frames onto the HDMI framebuffer
    pub mirror_hdmi: bool,
    /// Framebuffer name under /sys/class/graphics
    pub mirror_device: String,
    pub panel: PanelConfig,
    pub spi: SpiConfig,
    pub pins: PinsConfig,
    pub timing: TimingConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
            rotation: Rotation::Deg90,
            mirror_hdmi: true,
            mirror_device: "fb0".into(),
            panel: PanelConfig::default(),
            spi: SpiConfig::default(),
            pins: PinsConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl DisplayConfig {
    /// Logical frame extent
    pub fn logical(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let logical = self.logical();
        let panel = self.panel.resolution();
        if logical.area() == 0 || self.rotation.device_resolution(logical) != panel {
            return Err(ConfigError::GeometryMismatch {
                logical,
                rotation: self.rotation.degrees(),
                panel,
            });
        }
        if self.spi.mode > 3 {
            return Err(ConfigError::InvalidSpiMode(self.spi.mode));
        }
        if self.spi.max_transfer == 0 || self.spi.max_transfer > 65536 {
            return Err(ConfigError::InvalidTransfer(self.spi.max_transfer));
        }
        if self.spi.device.is_empty() {
            return Err(ConfigError::EmptyPath("display.spi.device"));
        }
        if self.timing.tick_ms == 0 {
            return Err(ConfigError::ZeroInterval("display.timing.tick_ms"));
        }
        if self.timing.idle_page_seconds == 0 {
            return Err(ConfigError::ZeroInterval("display.timing.idle_page_seconds"));
        }
        Ok(())
    }
}
