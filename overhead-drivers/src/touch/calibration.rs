//! Raw-to-logical touch calibration
//!
//! Two-point linear map per axis. Each axis is described by the raw reading
//! at the first and last logical pixel; listing them high-to-low inverts the
//! axis. An optional swap handles sensors mounted a quarter turn from the
//! logical orientation.

use overhead_core::config::TouchConfig;
use overhead_core::geometry::Resolution;
use overhead_hal::RawTouch;

/// Per-axis linear calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    x: (u16, u16),
    y: (u16, u16),
    swap_xy: bool,
    logical: Resolution,
}

impl Calibration {
    /// Build from configuration
    ///
    /// # Arguments
    /// - `logical`: resolution taps are reported in
    pub fn new(config: &TouchConfig, logical: Resolution) -> Self {
        Self {
            x: (config.raw_x_min, config.raw_x_max),
            y: (config.raw_y_min, config.raw_y_max),
            swap_xy: config.swap_xy,
            logical,
        }
    }

    /// Map a raw sample to logical pixels, clamped to the screen
    pub fn apply(&self, raw: &RawTouch) -> (u16, u16) {
        let (a, b) = if self.swap_xy {
            (raw.y, raw.x)
        } else {
            (raw.x, raw.y)
        };
        (
            map_axis(a, self.x, self.logical.width),
            map_axis(b, self.y, self.logical.height),
        )
    }
}

fn map_axis(value: u16, (from, to): (u16, u16), span: u32) -> u16 {
    let last = span.saturating_sub(1) as f32;
    let range = to as f32 - from as f32;
    if range == 0.0 {
        return 0;
    }
    let t = (value as f32 - from as f32) / range;
    (t * last).round().clamp(0.0, last) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LOGICAL: Resolution = Resolution::new(480, 320);

    fn config(swap_xy: bool) -> TouchConfig {
        TouchConfig {
            raw_x_min: 200,
            raw_x_max: 3900,
            raw_y_min: 200,
            raw_y_max: 3900,
            swap_xy,
            ..Default::default()
        }
    }

    fn raw(x: u16, y: u16) -> RawTouch {
        RawTouch { x, y, pressed: true }
    }

    #[test]
    fn test_endpoints() {
        let cal = Calibration::new(&config(false), LOGICAL);
        assert_eq!(cal.apply(&raw(200, 200)), (0, 0));
        assert_eq!(cal.apply(&raw(3900, 3900)), (479, 319));
    }

    #[test]
    fn test_clamps_out_of_range() {
        let cal = Calibration::new(&config(false), LOGICAL);
        assert_eq!(cal.apply(&raw(0, 0)), (0, 0));
        assert_eq!(cal.apply(&raw(4095, 4095)), (479, 319));
    }

    #[test]
    fn test_inverted_axis() {
        let mut cfg = config(false);
        cfg.raw_x_min = 3900;
        cfg.raw_x_max = 200;
        let cal = Calibration::new(&cfg, LOGICAL);
        assert_eq!(cal.apply(&raw(3900, 200)).0, 0);
        assert_eq!(cal.apply(&raw(200, 200)).0, 479);
    }

    #[test]
    fn test_swap_axes() {
        let cal = Calibration::new(&config(true), LOGICAL);
        // Raw Y drives logical X
        assert_eq!(cal.apply(&raw(200, 3900)), (479, 0));
    }

    #[test]
    fn test_midpoint() {
        let cal = Calibration::new(&config(false), LOGICAL);
        let (x, y) = cal.apply(&raw(2050, 2050));
        assert!((239..=240).contains(&x));
        assert!((159..=160).contains(&y));
    }

    #[test]
    fn test_default_config_maps_corners() {
        let cal = Calibration::new(&TouchConfig::default(), LOGICAL);
        assert_eq!(cal.apply(&raw(200, 3900)), (0, 0));
        assert_eq!(cal.apply(&raw(3900, 200)), (479, 319));
    }

    proptest! {
        #[test]
        fn prop_always_on_screen(x in any::<u16>(), y in any::<u16>(), swap in any::<bool>()) {
            let cal = Calibration::new(&config(swap), LOGICAL);
            let (lx, ly) = cal.apply(&raw(x, y));
            prop_assert!(u32::from(lx) < LOGICAL.width);
            prop_assert!(u32::from(ly) < LOGICAL.height);
        }
    }
}
