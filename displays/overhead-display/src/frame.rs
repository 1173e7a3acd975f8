//! Logical frame buffer
//!
//! A full RGB888 canvas at the logical resolution. Screens draw into it
//! with `embedded-graphics`; the converter reads it back row by row.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use overhead_core::geometry::Resolution;

/// Device-independent RGB888 frame
#[derive(Clone, PartialEq, Eq)]
pub struct LogicalFrame {
    resolution: Resolution,
    /// Row-major pixels
    pixels: Vec<Rgb888>,
}

impl core::fmt::Debug for LogicalFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LogicalFrame")
            .field("resolution", &self.resolution)
            .finish_non_exhaustive()
    }
}

impl LogicalFrame {
    /// Create a black frame
    pub fn new(resolution: Resolution) -> Self {
        Self::filled(resolution, Rgb888::BLACK)
    }

    /// Create a frame of one color
    pub fn filled(resolution: Resolution, color: Rgb888) -> Self {
        Self {
            resolution,
            pixels: vec![color; resolution.area()],
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Pixel at (x, y), `None` outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x < self.resolution.width && y < self.resolution.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Pixel at (x, y) without the option; caller guarantees bounds
    pub(crate) fn at(&self, x: u32, y: u32) -> Rgb888 {
        self.pixels[self.index(x, y)]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb888) {
        if x < self.resolution.width && y < self.resolution.height {
            let i = self.index(x, y);
            self.pixels[i] = color;
        }
    }

    /// One row of pixels
    pub fn row(&self, y: u32) -> &[Rgb888] {
        let w = self.resolution.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    /// Copy into a frame of `target` size, cropping or padding with black
    pub fn fit_to(&self, target: Resolution) -> LogicalFrame {
        let mut out = LogicalFrame::new(target);
        let w = self.resolution.width.min(target.width);
        let h = self.resolution.height.min(target.height);
        for y in 0..h {
            for x in 0..w {
                out.set_pixel(x, y, self.at(x, y));
            }
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.resolution.width as usize + x as usize
    }
}

impl OriginDimensions for LogicalFrame {
    fn size(&self) -> Size {
        Size::new(self.resolution.width, self.resolution.height)
    }
}

impl DrawTarget for LogicalFrame {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if let Some(bottom_right) = area.bottom_right() {
            let w = self.resolution.width as usize;
            for y in area.top_left.y..=bottom_right.y {
                let start = y as usize * w + area.top_left.x as usize;
                let end = y as usize * w + bottom_right.x as usize + 1;
                self.pixels[start..end].fill(color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, StyledDrawable};

    #[test]
    fn test_new_frame_is_black() {
        let frame = LogicalFrame::new(Resolution::new(4, 3));
        assert_eq!(frame.pixel(3, 2), Some(Rgb888::BLACK));
        assert_eq!(frame.pixel(4, 0), None);
    }

    #[test]
    fn test_fill_solid_clips() {
        let mut frame = LogicalFrame::new(Resolution::new(10, 10));
        Rectangle::new(Point::new(8, 8), Size::new(5, 5))
            .draw_styled(&PrimitiveStyle::with_fill(Rgb888::RED), &mut frame)
            .unwrap();
        assert_eq!(frame.pixel(9, 9), Some(Rgb888::RED));
        assert_eq!(frame.pixel(7, 9), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_negative_points_ignored() {
        let mut frame = LogicalFrame::new(Resolution::new(2, 2));
        frame
            .draw_iter([Pixel(Point::new(-1, 0), Rgb888::WHITE)])
            .unwrap();
        assert_eq!(frame, LogicalFrame::new(Resolution::new(2, 2)));
    }

    #[test]
    fn test_fit_to_crops_and_pads() {
        let mut frame = LogicalFrame::filled(Resolution::new(4, 2), Rgb888::WHITE);
        frame.set_pixel(3, 1, Rgb888::RED);

        let cropped = frame.fit_to(Resolution::new(2, 4));
        assert_eq!(cropped.pixel(1, 1), Some(Rgb888::WHITE));
        assert_eq!(cropped.pixel(1, 2), Some(Rgb888::BLACK));
    }
}
