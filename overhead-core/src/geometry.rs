//! Display geometry
//!
//! Logical frames are drawn in landscape and rotated onto the panel's
//! native scan order. Rotation is clockwise and forms a closed group:
//! four quarter turns are the identity.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Same extent with axes exchanged
    pub const fn transposed(&self) -> Self {
        Self::new(self.height, self.width)
    }
}

impl core::fmt::Display for Resolution {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Clockwise rotation from logical frame to device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u16", into = "u16"))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// All rotations in quarter-turn order
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Rotation angle in degrees
    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Number of clockwise quarter turns
    const fn quarter_turns(self) -> u8 {
        (self.degrees() / 90) as u8
    }

    const fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    /// Apply `self`, then `other`
    pub const fn then(self, other: Rotation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// Rotation that undoes `self`
    pub const fn inverse(self) -> Self {
        Self::from_quarter_turns(4 - self.quarter_turns())
    }

    /// Whether width and height trade places
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Device extent for a logical extent
    pub const fn device_resolution(self, logical: Resolution) -> Resolution {
        if self.swaps_axes() {
            logical.transposed()
        } else {
            logical
        }
    }

    /// Map a logical pixel to its device position
    ///
    /// # Arguments
    /// - `x`, `y`: Logical coordinates, inside `logical`
    /// - `logical`: Logical frame extent
    pub const fn to_device(self, x: u32, y: u32, logical: Resolution) -> (u32, u32) {
        let (w, h) = (logical.width, logical.height);
        match self {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (h - 1 - y, x),
            Rotation::Deg180 => (w - 1 - x, h - 1 - y),
            Rotation::Deg270 => (y, w - 1 - x),
        }
    }

    /// Map a device pixel back to the logical pixel that feeds it
    ///
    /// This is the direction the converter walks: device rows in scan
    /// order, fetching from the logical frame.
    pub const fn to_logical(self, dx: u32, dy: u32, logical: Resolution) -> (u32, u32) {
        let (w, h) = (logical.width, logical.height);
        match self {
            Rotation::Deg0 => (dx, dy),
            Rotation::Deg90 => (dy, h - 1 - dx),
            Rotation::Deg180 => (w - 1 - dx, h - 1 - dy),
            Rotation::Deg270 => (w - 1 - dy, dx),
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = InvalidRotation;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(InvalidRotation(other)),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Rotation not a multiple of 90 degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rotation must be 0, 90, 180 or 270 degrees, got {0}")]
pub struct InvalidRotation(pub u16);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LOGICAL: Resolution = Resolution::new(480, 320);

    #[test]
    fn test_device_resolution() {
        assert_eq!(Rotation::Deg0.device_resolution(LOGICAL), LOGICAL);
        assert_eq!(
            Rotation::Deg90.device_resolution(LOGICAL),
            Resolution::new(320, 480)
        );
        assert_eq!(Rotation::Deg180.device_resolution(LOGICAL), LOGICAL);
        assert_eq!(
            Rotation::Deg270.device_resolution(LOGICAL),
            Resolution::new(320, 480)
        );
    }

    #[test]
    fn test_corners_deg90() {
        // Logical top-left lands in the device's top-right corner
        assert_eq!(Rotation::Deg90.to_device(0, 0, LOGICAL), (319, 0));
        // Logical bottom-left lands in the device's top-left corner
        assert_eq!(Rotation::Deg90.to_device(0, 319, LOGICAL), (0, 0));
    }

    #[test]
    fn test_from_degrees() {
        assert_eq!(Rotation::try_from(270), Ok(Rotation::Deg270));
        assert_eq!(Rotation::try_from(45), Err(InvalidRotation(45)));
    }

    #[test]
    fn test_inverse() {
        for r in Rotation::ALL {
            assert_eq!(r.then(r.inverse()), Rotation::Deg0);
        }
    }

    proptest! {
        #[test]
        fn prop_to_logical_inverts_to_device(
            r in 0usize..4,
            x in 0u32..480,
            y in 0u32..320,
        ) {
            let rot = Rotation::ALL[r];
            let (dx, dy) = rot.to_device(x, y, LOGICAL);
            let dev = rot.device_resolution(LOGICAL);
            prop_assert!(dx < dev.width && dy < dev.height);
            prop_assert_eq!(rot.to_logical(dx, dy, LOGICAL), (x, y));
        }

        #[test]
        fn prop_four_quarter_turns_are_identity(x in 0u32..480, y in 0u32..320) {
            let mut extent = LOGICAL;
            let mut p = (x, y);
            for _ in 0..4 {
                p = Rotation::Deg90.to_device(p.0, p.1, extent);
                extent = Rotation::Deg90.device_resolution(extent);
            }
            prop_assert_eq!(extent, LOGICAL);
            prop_assert_eq!(p, (x, y));
        }

        #[test]
        fn prop_composition_matches_sequential(
            a in 0usize..4,
            b in 0usize..4,
            x in 0u32..480,
            y in 0u32..320,
        ) {
            let (ra, rb) = (Rotation::ALL[a], Rotation::ALL[b]);
            let (ax, ay) = ra.to_device(x, y, LOGICAL);
            let mid = ra.device_resolution(LOGICAL);
            let sequential = rb.to_device(ax, ay, mid);
            let composed = ra.then(rb).to_device(x, y, LOGICAL);
            prop_assert_eq!(sequential, composed);
        }
    }
}
