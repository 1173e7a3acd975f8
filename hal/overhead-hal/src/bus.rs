//! Display bus configuration
//!
//! Describes how the panel's SPI bus is clocked and how large a single
//! transfer may be. The transfer limit differs per host (spidev's `bufsiz`
//! module parameter on Linux), so it is configuration rather than a constant.

/// Default spidev transfer limit on Raspberry Pi OS
pub const DEFAULT_MAX_TRANSFER: usize = 4096;

/// SPI bus configuration for the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock mode
    pub mode: Mode,
    /// Largest single transfer the host driver accepts, in bytes
    pub max_transfer: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            frequency: 16_000_000, // 16 MHz
            mode: Mode::Mode0,
            max_transfer: DEFAULT_MAX_TRANSFER,
        }
    }
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    #[default]
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl Mode {
    /// Build a mode from its conventional number (0-3)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Mode::Mode0),
            1 => Some(Mode::Mode1),
            2 => Some(Mode::Mode2),
            3 => Some(Mode::Mode3),
            _ => None,
        }
    }

    /// Clock idles high (CPOL=1)
    pub fn idles_high(self) -> bool {
        matches!(self, Mode::Mode2 | Mode::Mode3)
    }

    /// Data sampled on the trailing clock edge (CPHA=1)
    pub fn samples_on_trailing_edge(self) -> bool {
        matches!(self, Mode::Mode1 | Mode::Mode3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_index() {
        assert_eq!(Mode::from_index(0), Some(Mode::Mode0));
        assert_eq!(Mode::from_index(3), Some(Mode::Mode3));
        assert_eq!(Mode::from_index(4), None);
    }

    #[test]
    fn test_mode_clock_bits() {
        assert!(!Mode::Mode0.idles_high() && !Mode::Mode0.samples_on_trailing_edge());
        assert!(!Mode::Mode1.idles_high() && Mode::Mode1.samples_on_trailing_edge());
        assert!(Mode::Mode2.idles_high() && !Mode::Mode2.samples_on_trailing_edge());
        assert!(Mode::Mode3.idles_high() && Mode::Mode3.samples_on_trailing_edge());
    }
}
