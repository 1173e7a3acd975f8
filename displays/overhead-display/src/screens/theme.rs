//! Color scheme

use embedded_graphics::pixelcolor::Rgb888;

/// Fixed palette entries
pub mod palette {
    use embedded_graphics::pixelcolor::Rgb888;

    pub const BACKGROUND: Rgb888 = Rgb888::new(0x00, 0x00, 0x00);
    pub const TEXT: Rgb888 = Rgb888::new(0xFF, 0xFF, 0xFF);
    pub const SECONDARY: Rgb888 = Rgb888::new(0xAA, 0xAA, 0xAA);
    pub const ACCENT: Rgb888 = Rgb888::new(0x00, 0xAA, 0xFF);
    pub const DIVIDER: Rgb888 = Rgb888::new(0x33, 0x33, 0x33);
    pub const HEADER: Rgb888 = Rgb888::new(0x11, 0x11, 0x11);

    pub const ALTITUDE_HIGH: Rgb888 = Rgb888::new(0x00, 0xFF, 0x00);
    pub const ALTITUDE_MED: Rgb888 = Rgb888::new(0xFF, 0xFF, 0x00);
    pub const ALTITUDE_LOW: Rgb888 = Rgb888::new(0xFF, 0x88, 0x00);
    pub const CLIMBING: Rgb888 = Rgb888::new(0x00, 0xFF, 0x00);
    pub const DESCENDING: Rgb888 = Rgb888::new(0xFF, 0x44, 0x44);

    pub const TEMP_HOT: Rgb888 = Rgb888::new(0xFF, 0x44, 0x44);
    pub const TEMP_WARM: Rgb888 = Rgb888::new(0xFF, 0xAA, 0x00);
    pub const TEMP_MILD: Rgb888 = Rgb888::new(0x88, 0xFF, 0x88);
    pub const TEMP_COOL: Rgb888 = Rgb888::new(0x88, 0xCC, 0xFF);
    pub const TEMP_COLD: Rgb888 = Rgb888::new(0x44, 0x88, 0xFF);

    pub const WATCHLIST: Rgb888 = Rgb888::new(0xFF, 0x00, 0xFF);
    pub const WATCHLIST_BG: Rgb888 = Rgb888::new(0x33, 0x00, 0x33);
    pub const WATCHLIST_HEADER: Rgb888 = Rgb888::new(0x44, 0x11, 0x44);
}

/// Colors that change when a watched aircraft is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb888,
    pub header: Rgb888,
    /// Registration and aircraft glyph
    pub highlight: Rgb888,
}

impl Theme {
    pub const STANDARD: Theme = Theme {
        background: palette::BACKGROUND,
        header: palette::HEADER,
        highlight: palette::ACCENT,
    };

    pub const WATCHLIST: Theme = Theme {
        background: palette::WATCHLIST_BG,
        header: palette::WATCHLIST_HEADER,
        highlight: palette::WATCHLIST,
    };
}

/// Color for a temperature reading
pub fn temperature_color(celsius: f32) -> Rgb888 {
    if celsius >= 30.0 {
        palette::TEMP_HOT
    } else if celsius >= 20.0 {
        palette::TEMP_WARM
    } else if celsius >= 10.0 {
        palette::TEMP_MILD
    } else if celsius >= 0.0 {
        palette::TEMP_COOL
    } else {
        palette::TEMP_COLD
    }
}

/// Color for an altitude band
pub fn altitude_color(feet: i32) -> Rgb888 {
    if feet > 30_000 {
        palette::ALTITUDE_HIGH
    } else if feet > 10_000 {
        palette::ALTITUDE_MED
    } else {
        palette::ALTITUDE_LOW
    }
}
