//! Board bring-up
//!
//! Opens the panel's SPI device and GPIO lines once, checks that no line is
//! claimed twice, and hands the parts out by value.

use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions};
use linux_embedded_hal::sysfs_gpio;
use linux_embedded_hal::{Delay, SpidevDevice};
use thiserror::Error;
use tracing::info;

use overhead_hal::{BusConfig, Mode};

use crate::gpio::OutputLine;

/// One GPIO line assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineConfig {
    /// sysfs GPIO number
    pub number: u64,
    /// Active-low
    pub inverted: bool,
}

/// Everything needed to open the panel hardware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// spidev node, e.g. `/dev/spidev0.0`
    pub spi_path: String,
    pub bus: BusConfig,
    /// Data/command select
    pub dc: LineConfig,
    /// Controller reset
    pub reset: LineConfig,
    /// Backlight enable, if wired to a GPIO
    pub backlight: Option<LineConfig>,
}

/// Board bring-up errors
#[derive(Debug, Error)]
pub enum BoardError {
    /// SPI device could not be opened or configured
    #[error("SPI device {path}: {source}")]
    Spi {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// GPIO line could not be exported or driven
    #[error("GPIO{number}: {source}")]
    Gpio {
        number: u64,
        #[source]
        source: sysfs_gpio::Error,
    },
    /// The same line was assigned twice
    #[error("GPIO{0} assigned to more than one function")]
    PinConflict(u64),
}

/// Opened panel hardware
pub struct LinuxBoard {
    pub spi: SpidevDevice,
    pub dc: OutputLine,
    pub reset: OutputLine,
    pub backlight: Option<OutputLine>,
    pub delay: Delay,
}

fn spi_mode(mode: Mode) -> SpiModeFlags {
    let mut flags = SpiModeFlags::empty();
    if mode.idles_high() {
        flags |= SpiModeFlags::SPI_CPOL;
    }
    if mode.samples_on_trailing_edge() {
        flags |= SpiModeFlags::SPI_CPHA;
    }
    flags
}

/// Reject configurations that claim a line twice
fn check_conflicts(config: &BoardConfig) -> Result<(), BoardError> {
    let mut taken: Vec<u64> = Vec::with_capacity(3);
    let lines = [Some(config.dc), Some(config.reset), config.backlight];
    for line in lines.into_iter().flatten() {
        if taken.contains(&line.number) {
            return Err(BoardError::PinConflict(line.number));
        }
        taken.push(line.number);
    }
    Ok(())
}

fn open_line(line: LineConfig) -> Result<OutputLine, BoardError> {
    OutputLine::open(line.number, line.inverted).map_err(|source| BoardError::Gpio {
        number: line.number,
        source,
    })
}

impl LinuxBoard {
    /// Open and configure the bus and lines
    pub fn open(config: &BoardConfig) -> Result<Self, BoardError> {
        check_conflicts(config)?;

        let spi_err = |source| BoardError::Spi {
            path: config.spi_path.clone(),
            source,
        };
        let mut spi = Spidev::open(&config.spi_path).map_err(spi_err)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(config.bus.frequency)
            .mode(spi_mode(config.bus.mode))
            .build();
        spi.configure(&options).map_err(spi_err)?;
        info!(
            "SPI {} at {} Hz, {:?}, {} byte transfers",
            config.spi_path, config.bus.frequency, config.bus.mode, config.bus.max_transfer
        );

        let dc = open_line(config.dc)?;
        let reset = open_line(config.reset)?;
        let backlight = config.backlight.map(open_line).transpose()?;

        Ok(Self {
            spi: SpidevDevice(spi),
            dc,
            reset,
            backlight,
            delay: Delay {},
        })
    }
}
