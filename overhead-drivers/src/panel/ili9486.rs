//! ILI9486 SPI panel driver
//!
//! Drives the controller in 4-wire SPI mode: a data/command line selects
//! whether the bytes on the bus are a command opcode or its parameters.
//!
//! # Frame write
//!
//! Every frame is a full-screen update:
//! - CASET / PASET set the address window to the whole panel
//! - RAMWR starts the memory write
//! - Pixel data follows in chunks no larger than the host's SPI transfer
//!   limit
//!
//! The driver holds `&mut self` for the entire sequence, so commands from
//! other callers cannot land between the window setup and the data.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiDevice};
use thiserror::Error;
use tracing::{debug, info, trace};

use overhead_core::geometry::Resolution;
use overhead_display::{DeviceFrame, DisplayBackend, PixelFormat};

/// ILI9486 command opcodes
pub mod cmd {
    /// Enter sleep mode
    pub const SLPIN: u8 = 0x10;
    /// Leave sleep mode
    pub const SLPOUT: u8 = 0x11;
    /// Normal display mode
    pub const NORON: u8 = 0x13;
    /// Display off
    pub const DISPOFF: u8 = 0x28;
    /// Display on
    pub const DISPON: u8 = 0x29;
    /// Column address set
    pub const CASET: u8 = 0x2A;
    /// Page (row) address set
    pub const PASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
    /// Memory access control
    pub const MADCTL: u8 = 0x36;
    /// Interface pixel format
    pub const COLMOD: u8 = 0x3A;
    /// Power control 3
    pub const PWCTRL3: u8 = 0xC2;
    /// VCOM control
    pub const VMCTRL: u8 = 0xC5;
    /// Positive gamma correction
    pub const PGAMCTRL: u8 = 0xE0;
    /// Negative gamma correction
    pub const NGAMCTRL: u8 = 0xE1;
}

const POSITIVE_GAMMA: [u8; 15] = [
    0x0F, 0x1F, 0x1C, 0x0C, 0x0F, 0x08, 0x48, 0x98, 0x37, 0x0A, 0x13, 0x04, 0x11, 0x0D, 0x00,
];

const NEGATIVE_GAMMA: [u8; 15] = [
    0x0F, 0x32, 0x2E, 0x0B, 0x0D, 0x05, 0x47, 0x75, 0x37, 0x06, 0x10, 0x03, 0x24, 0x20, 0x00,
];

/// Reset low hold time
const RESET_HOLD_MS: u32 = 10;
/// Settle time after reset release and after sleep-out
const WAKE_SETTLE_MS: u32 = 120;

/// Panel transport errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// SPI transfer failed
    #[error("SPI transfer failed: {0}")]
    Spi(spi::ErrorKind),
    /// Data/command, reset or backlight line failed
    #[error("GPIO write failed: {0}")]
    Pin(digital::ErrorKind),
    /// Frame does not match the panel
    #[error("frame is {actual} {actual_format:?}, panel expects {expected} {expected_format:?}")]
    Geometry {
        expected: Resolution,
        expected_format: PixelFormat,
        actual: Resolution,
        actual_format: PixelFormat,
    },
    /// The controller has no interface mode for this encoding
    #[error("panel cannot accept {0:?} pixels")]
    UnsupportedFormat(PixelFormat),
    /// Frame written before `init`
    #[error("panel not initialized")]
    NotInitialized,
}

/// Static panel parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSettings {
    /// Native resolution in controller scan order
    pub resolution: Resolution,
    /// Bus pixel encoding
    pub format: PixelFormat,
    /// Memory access control byte
    pub madctl: u8,
    /// Largest single SPI transfer, bytes
    pub max_transfer: usize,
}

impl PanelSettings {
    /// COLMOD parameter for the configured encoding
    fn colmod(&self) -> Option<u8> {
        match self.format {
            PixelFormat::Rgb565Be => Some(0x55),
            PixelFormat::Rgb666 => Some(0x66),
            _ => None,
        }
    }
}

/// ILI9486 panel on an SPI bus
///
/// # Type parameters
/// - `SPI`: SPI device (chip select handled by the device)
/// - `DC`: data/command line, high for data
/// - `RST`: reset line, active low
/// - `BL`: backlight line, high for on
/// - `D`: delay provider
pub struct Ili9486<SPI, DC, RST, BL, D> {
    spi: SPI,
    dc: DC,
    reset: RST,
    backlight: Option<BL>,
    delay: D,
    settings: PanelSettings,
    colmod: u8,
    initialized: bool,
}

impl<SPI, DC, RST, BL, D> Ili9486<SPI, DC, RST, BL, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    /// Create a driver; no bus traffic until [`init`](Self::init)
    ///
    /// # Arguments
    /// - `backlight`: `None` when the backlight is hard-wired on
    pub fn new(
        spi: SPI,
        dc: DC,
        reset: RST,
        backlight: Option<BL>,
        delay: D,
        settings: PanelSettings,
    ) -> Result<Self, TransportError> {
        let colmod = settings
            .colmod()
            .ok_or(TransportError::UnsupportedFormat(settings.format))?;
        Ok(Self {
            spi,
            dc,
            reset,
            backlight,
            delay,
            settings,
            colmod,
            initialized: false,
        })
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Hardware reset and power-on command sequence
    pub fn init(&mut self) -> Result<(), TransportError> {
        info!(
            "Initializing ILI9486 {} (COLMOD 0x{:02X}, MADCTL 0x{:02X})",
            self.settings.resolution, self.colmod, self.settings.madctl
        );

        self.reset.set_high().map_err(pin_err)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        self.reset.set_low().map_err(pin_err)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        self.reset.set_high().map_err(pin_err)?;
        self.delay.delay_ms(WAKE_SETTLE_MS);

        self.command(cmd::SLPOUT, &[])?;
        self.delay.delay_ms(WAKE_SETTLE_MS);

        self.command(cmd::COLMOD, &[self.colmod])?;
        self.command(cmd::PWCTRL3, &[0x44])?;
        self.command(cmd::VMCTRL, &[0x00, 0x00, 0x00, 0x00])?;
        self.command(cmd::PGAMCTRL, &POSITIVE_GAMMA)?;
        self.command(cmd::NGAMCTRL, &NEGATIVE_GAMMA)?;
        self.command(cmd::MADCTL, &[self.settings.madctl])?;
        self.command(cmd::NORON, &[])?;
        self.command(cmd::DISPON, &[])?;

        self.initialized = true;
        self.backlight_on(true)?;
        debug!("ILI9486 ready");
        Ok(())
    }

    /// Send one command with its parameters
    fn command(&mut self, opcode: u8, params: &[u8]) -> Result<(), TransportError> {
        self.dc.set_low().map_err(pin_err)?;
        self.spi.write(&[opcode]).map_err(spi_err)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(pin_err)?;
            self.spi.write(params).map_err(spi_err)?;
        }
        Ok(())
    }

    fn backlight_on(&mut self, on: bool) -> Result<(), TransportError> {
        if let Some(bl) = self.backlight.as_mut() {
            if on {
                bl.set_high().map_err(pin_err)?;
            } else {
                bl.set_low().map_err(pin_err)?;
            }
        }
        Ok(())
    }

    fn check_geometry(&self, frame: &DeviceFrame) -> Result<(), TransportError> {
        let res = self.settings.resolution;
        let expected_len = res.area() * self.settings.format.bytes_per_pixel();
        if frame.resolution() != res
            || frame.format() != self.settings.format
            || frame.as_bytes().len() != expected_len
        {
            return Err(TransportError::Geometry {
                expected: res,
                expected_format: self.settings.format,
                actual: frame.resolution(),
                actual_format: frame.format(),
            });
        }
        Ok(())
    }

    /// Push a full frame to GRAM
    pub fn write_frame(&mut self, frame: &DeviceFrame) -> Result<(), TransportError> {
        if !self.initialized {
            return Err(TransportError::NotInitialized);
        }
        self.check_geometry(frame)?;

        let [x_hi, x_lo] = (self.settings.resolution.width.saturating_sub(1) as u16).to_be_bytes();
        let [y_hi, y_lo] = (self.settings.resolution.height.saturating_sub(1) as u16).to_be_bytes();
        self.command(cmd::CASET, &[0, 0, x_hi, x_lo])?;
        self.command(cmd::PASET, &[0, 0, y_hi, y_lo])?;
        self.command(cmd::RAMWR, &[])?;

        self.dc.set_high().map_err(pin_err)?;
        let chunk = self.settings.max_transfer.max(1);
        for block in frame.as_bytes().chunks(chunk) {
            self.spi.write(block).map_err(spi_err)?;
        }
        trace!("Frame written ({} bytes)", frame.as_bytes().len());
        Ok(())
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), TransportError> {
        self.backlight_on(on)
    }

    /// Display off, sleep in, backlight off
    pub fn shutdown(&mut self) -> Result<(), TransportError> {
        info!("Shutting down panel");
        if self.initialized {
            self.command(cmd::DISPOFF, &[])?;
            self.command(cmd::SLPIN, &[])?;
            self.initialized = false;
        }
        self.backlight_on(false)
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, RST, Option<BL>, D) {
        (self.spi, self.dc, self.reset, self.backlight, self.delay)
    }
}

fn spi_err<E: spi::Error>(e: E) -> TransportError {
    TransportError::Spi(e.kind())
}

fn pin_err<E: digital::Error>(e: E) -> TransportError {
    TransportError::Pin(e.kind())
}

impl<SPI, DC, RST, BL, D> DisplayBackend for Ili9486<SPI, DC, RST, BL, D>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    type Error = TransportError;

    fn resolution(&self) -> Resolution {
        self.settings.resolution
    }

    fn format(&self) -> PixelFormat {
        self.settings.format
    }

    fn write_frame(&mut self, frame: &DeviceFrame) -> Result<(), Self::Error> {
        Ili9486::write_frame(self, frame)
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error> {
        Ili9486::set_backlight(self, on)
    }

    fn shutdown(&mut self) -> Result<(), Self::Error> {
        Ili9486::shutdown(self)
    }
}
