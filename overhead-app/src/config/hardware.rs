//! Configuration to driver parameter mapping

use overhead_core::config::{Config, PinConfig};
use overhead_core::state::MachineTiming;
use overhead_display::PixelFormat;
use overhead_drivers::panel::PanelSettings;
use overhead_hal::{BusConfig, Mode};
use overhead_hal_linux::{BoardConfig, LineConfig};

fn line(pin: PinConfig) -> LineConfig {
    LineConfig {
        number: u64::from(pin.pin),
        inverted: pin.inverted,
    }
}

/// SPI device and control lines
pub fn board_config(config: &Config) -> BoardConfig {
    let display = &config.display;
    BoardConfig {
        spi_path: display.spi.device.clone(),
        bus: BusConfig {
            frequency: display.spi.frequency_hz,
            // Range checked by validation
            mode: Mode::from_index(display.spi.mode).unwrap_or_default(),
            max_transfer: display.spi.max_transfer,
        },
        dc: line(display.pins.dc),
        reset: line(display.pins.reset),
        backlight: display.pins.backlight.map(line),
    }
}

/// Controller parameters for the panel driver
pub fn panel_settings(config: &Config) -> PanelSettings {
    let display = &config.display;
    PanelSettings {
        resolution: display.panel.resolution(),
        format: PixelFormat::from(display.panel.pixel_format),
        madctl: display.panel.madctl,
        max_transfer: display.spi.max_transfer,
    }
}

/// Splash and idle paging timers
pub fn machine_timing(config: &Config) -> MachineTiming {
    MachineTiming {
        splash_min: config.display.timing.splash_min(),
        idle_page: config.display.timing.idle_page(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overhead_core::config::PanelPixelFormat;
    use overhead_core::geometry::Resolution;

    #[test]
    fn test_default_mapping() {
        let config = Config::default();
        let board = board_config(&config);
        assert_eq!(board.spi_path, "/dev/spidev0.0");
        assert_eq!(board.bus.frequency, 16_000_000);
        assert_eq!(board.dc.number, 24);
        assert_eq!(board.reset.number, 25);
        assert!(board.backlight.is_none());

        let panel = panel_settings(&config);
        assert_eq!(panel.resolution, Resolution::new(320, 480));
        assert_eq!(panel.format, PixelFormat::Rgb565Be);
    }

    #[test]
    fn test_inverted_backlight() {
        let mut config = Config::default();
        config.display.pins.backlight = Some(PinConfig::inverted(18));
        config.display.panel.pixel_format = PanelPixelFormat::Rgb666;
        assert_eq!(
            board_config(&config).backlight,
            Some(LineConfig {
                number: 18,
                inverted: true
            })
        );
        assert_eq!(panel_settings(&config).format, PixelFormat::Rgb666);
    }
}
