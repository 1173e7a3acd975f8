//! Panel drivers
//!
//! Only the ILI9486 controller found on the common 3.5" 480x320 SPI hats is
//! supported. The driver is generic over `embedded-hal` traits so it can be
//! tested against mock buses and pins.

mod ili9486;

pub use ili9486::{cmd, Ili9486, PanelSettings, TransportError};
