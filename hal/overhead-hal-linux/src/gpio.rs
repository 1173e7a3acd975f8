//! Polarity-aware sysfs output line

use embedded_hal::digital::{ErrorType, OutputPin};
use linux_embedded_hal::sysfs_gpio::{self, Direction, Pin};
use linux_embedded_hal::{SysfsPin, SysfsPinError};
use tracing::debug;

/// How long udev needs to fix up permissions on a freshly exported line
const EXPORT_SETTLE: std::time::Duration = std::time::Duration::from_millis(50);

/// GPIO output line
///
/// The line can be configured as active-high (default) or active-low; the
/// `OutputPin` methods always speak in logical levels.
pub struct OutputLine {
    pin: SysfsPin,
    /// If true, logical high = physical low
    inverted: bool,
}

impl OutputLine {
    /// Export `number` and drive it to its logical-low level
    ///
    /// # Arguments
    /// - `number`: sysfs GPIO number (BCM numbering on a Raspberry Pi)
    /// - `inverted`: If true, the line is active-low
    pub fn open(number: u64, inverted: bool) -> Result<Self, sysfs_gpio::Error> {
        let pin = Pin::new(number);
        pin.export()?;
        std::thread::sleep(EXPORT_SETTLE);
        let idle = if inverted {
            Direction::High
        } else {
            Direction::Low
        };
        pin.set_direction(idle)?;
        debug!("GPIO{} exported (inverted: {})", number, inverted);
        Ok(Self {
            pin: SysfsPin(pin),
            inverted,
        })
    }

    pub fn number(&self) -> u64 {
        self.pin.0.get_pin_num()
    }
}

impl ErrorType for OutputLine {
    type Error = SysfsPinError;
}

impl OutputPin for OutputLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.inverted {
            self.pin.set_low()
        } else {
            self.pin.set_high()
        }
    }
}
