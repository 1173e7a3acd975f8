//! Scene description and rasterizer
//!
//! Screens describe what they want drawn as a flat list of positioned
//! operations. Keeping that list separate from the pixels makes screen
//! content inspectable (tests look for strings in the scene) and keeps all
//! `embedded-graphics` plumbing in one place.

use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_7X13};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Baseline, Text};

/// Text sizes
///
/// The two bitmap fonts are pixel-doubled (or tripled) for headline text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    /// 7x13
    Small,
    /// 10x20
    Medium,
    /// 10x20 doubled
    Large,
    /// 10x20 tripled
    Huge,
}

impl FontSize {
    fn font(self) -> &'static MonoFont<'static> {
        match self {
            FontSize::Small => &FONT_7X13,
            FontSize::Medium | FontSize::Large | FontSize::Huge => &FONT_10X20,
        }
    }

    fn scale(self) -> u32 {
        match self {
            FontSize::Small | FontSize::Medium => 1,
            FontSize::Large => 2,
            FontSize::Huge => 3,
        }
    }

    /// Rendered size of `text` in pixels
    pub fn measure(self, text: &str) -> Size {
        let font = self.font();
        let n = text.chars().count() as u32;
        let width = if n == 0 {
            0
        } else {
            n * font.character_size.width + (n - 1) * font.character_spacing
        };
        Size::new(width, font.character_size.height) * self.scale()
    }
}

/// Which point of the text box `position` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// One draw operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Fill the whole target
    Clear(Rgb888),
    /// Rectangle, filled or 1 px outline
    Rect {
        top_left: Point,
        size: Size,
        color: Rgb888,
        filled: bool,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgb888,
        width: u32,
    },
    /// Circle outline
    Circle {
        center: Point,
        diameter: u32,
        color: Rgb888,
        stroke: u32,
    },
    Text {
        text: String,
        position: Point,
        anchor: Anchor,
        size: FontSize,
        color: Rgb888,
    },
    /// Aircraft silhouette pointing along `heading` (degrees, 0 = up)
    Plane {
        center: Point,
        size: u32,
        heading: u16,
        color: Rgb888,
    },
}

/// Ordered list of draw operations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    ops: Vec<DrawOp>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn clear(&mut self, color: Rgb888) {
        self.push(DrawOp::Clear(color));
    }

    pub fn fill_rect(&mut self, top_left: Point, size: Size, color: Rgb888) {
        self.push(DrawOp::Rect {
            top_left,
            size,
            color,
            filled: true,
        });
    }

    /// Full-width horizontal divider
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Rgb888) {
        self.push(DrawOp::Line {
            from: Point::new(x0, y),
            to: Point::new(x1, y),
            color,
            width: 1,
        });
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        position: Point,
        anchor: Anchor,
        size: FontSize,
        color: Rgb888,
    ) {
        self.push(DrawOp::Text {
            text: text.into(),
            position,
            anchor,
            size,
            color,
        });
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// All text strings, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether any text operation contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Draw every operation into `target`
    pub fn rasterize<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        for op in &self.ops {
            match op {
                DrawOp::Clear(color) => target.clear(*color)?,
                DrawOp::Rect {
                    top_left,
                    size,
                    color,
                    filled,
                } => {
                    let style = if *filled {
                        PrimitiveStyle::with_fill(*color)
                    } else {
                        PrimitiveStyle::with_stroke(*color, 1)
                    };
                    Rectangle::new(*top_left, *size)
                        .into_styled(style)
                        .draw(target)?;
                }
                DrawOp::Line {
                    from,
                    to,
                    color,
                    width,
                } => {
                    Line::new(*from, *to)
                        .into_styled(PrimitiveStyle::with_stroke(*color, *width))
                        .draw(target)?;
                }
                DrawOp::Circle {
                    center,
                    diameter,
                    color,
                    stroke,
                } => {
                    Circle::with_center(*center, *diameter)
                        .into_styled(PrimitiveStyle::with_stroke(*color, *stroke))
                        .draw(target)?;
                }
                DrawOp::Text {
                    text,
                    position,
                    anchor,
                    size,
                    color,
                } => draw_text(target, text, *position, *anchor, *size, *color)?,
                DrawOp::Plane {
                    center,
                    size,
                    heading,
                    color,
                } => draw_plane(target, *center, *size, *heading, *color)?,
            }
        }
        Ok(())
    }
}

fn draw_text<D>(
    target: &mut D,
    text: &str,
    position: Point,
    anchor: Anchor,
    size: FontSize,
    color: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let extent = size.measure(text);
    let (w, h) = (extent.width as i32, extent.height as i32);
    let top_left = match anchor {
        Anchor::TopLeft => position,
        Anchor::TopCenter => position - Point::new(w / 2, 0),
        Anchor::TopRight => position - Point::new(w, 0),
        Anchor::BottomLeft => position - Point::new(0, h),
        Anchor::BottomRight => position - Point::new(w, h),
    };

    let style = MonoTextStyle::new(size.font(), color);
    let scale = size.scale();
    if scale == 1 {
        Text::with_baseline(text, top_left, style, Baseline::Top).draw(target)?;
    } else {
        let mut scaled = Scaled {
            inner: target,
            origin: top_left,
            factor: scale,
        };
        Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut scaled)?;
    }
    Ok(())
}

/// Silhouette in unit coordinates, nose toward -y
const PLANE_TRIANGLES: [[(f32, f32); 3]; 5] = [
    // Nose
    [(0.0, -1.0), (-0.09, -0.7), (0.09, -0.7)],
    // Fuselage
    [(-0.09, -0.7), (0.09, -0.7), (0.09, 0.8)],
    [(-0.09, -0.7), (0.09, 0.8), (-0.09, 0.8)],
    // Wings
    [(0.0, -0.3), (-0.95, 0.15), (0.95, 0.15)],
    // Tailplane
    [(0.0, 0.5), (-0.4, 0.85), (0.4, 0.85)],
];

fn draw_plane<D>(
    target: &mut D,
    center: Point,
    size: u32,
    heading: u16,
    color: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let radius = size as f32 / 2.0;
    let (sin, cos) = (heading as f32).to_radians().sin_cos();
    let place = |(x, y): (f32, f32)| {
        // Clockwise in screen space (y down)
        let rx = x * cos - y * sin;
        let ry = x * sin + y * cos;
        center + Point::new((rx * radius).round() as i32, (ry * radius).round() as i32)
    };

    let style = PrimitiveStyle::with_fill(color);
    for [a, b, c] in PLANE_TRIANGLES {
        Triangle::new(place(a), place(b), place(c))
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

/// Pixel-replicating view of a draw target
struct Scaled<'a, D> {
    inner: &'a mut D,
    origin: Point,
    factor: u32,
}

impl<D: DrawTarget<Color = Rgb888>> Dimensions for Scaled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        let inner = self.inner.bounding_box();
        Rectangle::new(Point::zero(), inner.size / self.factor)
    }
}

impl<D: DrawTarget<Color = Rgb888>> DrawTarget for Scaled<'_, D> {
    type Color = Rgb888;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new_equal(self.factor);
        for Pixel(point, color) in pixels {
            let at = self.origin + point * self.factor as i32;
            self.inner.fill_solid(&Rectangle::new(at, block), color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::LogicalFrame;
    use overhead_core::geometry::Resolution;

    fn raster(scene: &Scene, w: u32, h: u32) -> LogicalFrame {
        let mut frame = LogicalFrame::new(Resolution::new(w, h));
        scene.rasterize(&mut frame).unwrap_or_else(|never| match never {});
        frame
    }

    fn lit(frame: &LogicalFrame) -> impl Iterator<Item = (u32, u32)> + '_ {
        let res = frame.resolution();
        (0..res.height).flat_map(move |y| {
            (0..res.width).filter_map(move |x| {
                (frame.pixel(x, y) != Some(Rgb888::BLACK)).then_some((x, y))
            })
        })
    }

    #[test]
    fn test_measure() {
        assert_eq!(FontSize::Medium.measure("ABC"), Size::new(30, 20));
        assert_eq!(FontSize::Large.measure("ABC"), Size::new(60, 40));
        assert_eq!(FontSize::Small.measure(""), Size::new(0, 13));
    }

    #[test]
    fn test_contains_text() {
        let mut scene = Scene::new();
        scene.text("G-EUPT", Point::zero(), Anchor::TopLeft, FontSize::Small, Rgb888::WHITE);
        assert!(scene.contains_text("EUPT"));
        assert!(!scene.contains_text("N628TS"));
    }

    #[test]
    fn test_right_anchor_stays_left_of_position() {
        let mut scene = Scene::new();
        scene.text("8888", Point::new(100, 10), Anchor::TopRight, FontSize::Medium, Rgb888::WHITE);
        let frame = raster(&scene, 120, 40);
        let xs: Vec<u32> = lit(&frame).map(|(x, _)| x).collect();
        assert!(!xs.is_empty());
        assert!(xs.iter().all(|&x| (60..100).contains(&x)));
    }

    #[test]
    fn test_scaled_text_is_larger() {
        let mut small = Scene::new();
        small.text("8", Point::zero(), Anchor::TopLeft, FontSize::Medium, Rgb888::WHITE);
        let mut large = Scene::new();
        large.text("8", Point::zero(), Anchor::TopLeft, FontSize::Large, Rgb888::WHITE);

        let n_small = lit(&raster(&small, 40, 60)).count();
        let n_large = lit(&raster(&large, 40, 60)).count();
        assert_eq!(n_large, n_small * 4);
    }

    #[test]
    fn test_plane_points_along_heading() {
        let mut scene = Scene::new();
        scene.push(DrawOp::Plane {
            center: Point::new(50, 50),
            size: 40,
            heading: 90,
            color: Rgb888::WHITE,
        });
        let frame = raster(&scene, 100, 100);
        // Nose points east, tail west
        assert_eq!(frame.pixel(66, 50), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(60, 50), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(73, 50), Some(Rgb888::BLACK));
        assert_eq!(frame.pixel(28, 50), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_clear_then_rect() {
        let mut scene = Scene::new();
        scene.clear(Rgb888::new(0x33, 0, 0x33));
        scene.fill_rect(Point::new(0, 0), Size::new(10, 5), Rgb888::WHITE);
        let frame = raster(&scene, 20, 20);
        assert_eq!(frame.pixel(9, 4), Some(Rgb888::WHITE));
        assert_eq!(frame.pixel(10, 4), Some(Rgb888::new(0x33, 0, 0x33)));
    }
}
