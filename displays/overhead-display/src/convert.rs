//! Framebuffer conversion
//!
//! Turns a [`LogicalFrame`] into bus-native bytes. Conversion is a pure
//! function of (frame, rotation, format): no state is carried between
//! calls and identical inputs produce identical bytes.
//!
//! Rotation is applied by walking the device frame in scan order and
//! fetching the logical pixel that lands there, so no rotated copy of the
//! image is ever materialized.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use thiserror::Error;

use overhead_core::config::PanelPixelFormat;
use overhead_core::geometry::{Resolution, Rotation};

use crate::frame::LogicalFrame;

/// Bus-native pixel encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 16-bit 5-6-5, most significant byte first (SPI panels)
    Rgb565Be,
    /// 16-bit 5-6-5, least significant byte first (16 bpp fbdev)
    Rgb565Le,
    /// 18-bit 6-6-6 carried in three bytes, low two bits zero
    Rgb666,
    /// 24-bit, red first
    Rgb888,
    /// 24-bit, blue first (24 bpp fbdev)
    Bgr888,
    /// 32-bit, blue first, opaque alpha (32 bpp fbdev)
    Bgra8888,
}

impl PixelFormat {
    /// Bytes one pixel occupies
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb565Be | PixelFormat::Rgb565Le => 2,
            PixelFormat::Rgb666 | PixelFormat::Rgb888 | PixelFormat::Bgr888 => 3,
            PixelFormat::Bgra8888 => 4,
        }
    }

    /// Append one encoded pixel to `out`
    #[inline]
    pub fn encode(self, color: Rgb888, out: &mut Vec<u8>) {
        let (r, g, b) = (color.r(), color.g(), color.b());
        match self {
            PixelFormat::Rgb565Be => out.extend_from_slice(&rgb565(r, g, b).to_be_bytes()),
            PixelFormat::Rgb565Le => out.extend_from_slice(&rgb565(r, g, b).to_le_bytes()),
            PixelFormat::Rgb666 => out.extend_from_slice(&[r & 0xFC, g & 0xFC, b & 0xFC]),
            PixelFormat::Rgb888 => out.extend_from_slice(&[r, g, b]),
            PixelFormat::Bgr888 => out.extend_from_slice(&[b, g, r]),
            PixelFormat::Bgra8888 => out.extend_from_slice(&[b, g, r, 0xFF]),
        }
    }
}

impl From<PanelPixelFormat> for PixelFormat {
    fn from(format: PanelPixelFormat) -> Self {
        match format {
            PanelPixelFormat::Rgb565 => PixelFormat::Rgb565Be,
            PanelPixelFormat::Rgb666 => PixelFormat::Rgb666,
        }
    }
}

/// Pack 8-bit channels into 5-6-5
#[inline]
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// Conversion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Frame size differs from the configured logical resolution
    #[error("frame is {actual}, expected {expected}")]
    DimensionMismatch {
        expected: Resolution,
        actual: Resolution,
    },
}

/// Encoded pixels ready for a sink
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceFrame {
    resolution: Resolution,
    format: PixelFormat,
    /// Bytes per row including any padding
    stride: usize,
    bytes: Vec<u8>,
}

impl core::fmt::Debug for DeviceFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeviceFrame")
            .field("resolution", &self.resolution)
            .field("format", &self.format)
            .field("stride", &self.stride)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl DeviceFrame {
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Converter for one logical geometry, rotation and target format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConverter {
    logical: Resolution,
    rotation: Rotation,
    format: PixelFormat,
}

impl FrameConverter {
    /// Create a converter
    ///
    /// # Arguments
    /// - `logical`: Size every input frame must have
    /// - `rotation`: Clockwise rotation from logical frame to device
    /// - `format`: Target encoding
    pub const fn new(logical: Resolution, rotation: Rotation, format: PixelFormat) -> Self {
        Self {
            logical,
            rotation,
            format,
        }
    }

    pub fn logical(&self) -> Resolution {
        self.logical
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Extent of the frames this converter produces
    pub fn device_resolution(&self) -> Resolution {
        self.rotation.device_resolution(self.logical)
    }

    /// Convert one frame
    pub fn convert(&self, frame: &LogicalFrame) -> Result<DeviceFrame, ConvertError> {
        convert(frame, self.logical, self.rotation, self.format)
    }
}

/// Convert a logical frame to bus-native bytes
///
/// Fails without producing any output if `frame` is not `expected` in size.
pub fn convert(
    frame: &LogicalFrame,
    expected: Resolution,
    rotation: Rotation,
    format: PixelFormat,
) -> Result<DeviceFrame, ConvertError> {
    let actual = frame.resolution();
    if actual != expected {
        return Err(ConvertError::DimensionMismatch { expected, actual });
    }

    let device = rotation.device_resolution(expected);
    let stride = device.width as usize * format.bytes_per_pixel();
    let mut bytes = Vec::with_capacity(stride * device.height as usize);

    if rotation == Rotation::Deg0 {
        for y in 0..device.height {
            for &color in frame.row(y) {
                format.encode(color, &mut bytes);
            }
        }
    } else {
        for dy in 0..device.height {
            for dx in 0..device.width {
                let (x, y) = rotation.to_logical(dx, dy, expected);
                format.encode(frame.at(x, y), &mut bytes);
            }
        }
    }

    Ok(DeviceFrame {
        resolution: device,
        format,
        stride,
        bytes,
    })
}

/// Scale a frame into `target` without distortion
///
/// Uses a single nearest-neighbour scale factor for both axes (the largest
/// that fits), centres the result and fills the borders with black. Rows
/// are padded to `stride` bytes when the sink's line length exceeds the
/// visible width.
pub fn letterbox(
    frame: &LogicalFrame,
    target: Resolution,
    format: PixelFormat,
    stride: usize,
) -> DeviceFrame {
    let src = frame.resolution();
    let bpp = format.bytes_per_pixel();
    let stride = stride.max(target.width as usize * bpp);
    let mut bytes = Vec::with_capacity(stride * target.height as usize);

    let (tw, th) = (target.width as u64, target.height as u64);
    let (fw, fh) = (src.width as u64, src.height as u64);

    // Scaled extent: whichever axis runs out first sets the factor
    let (sw, sh) = if fw == 0 || fh == 0 {
        (0, 0)
    } else if tw * fh <= th * fw {
        (tw, fh * tw / fw)
    } else {
        (fw * th / fh, th)
    };
    let ox = (tw - sw) / 2;
    let oy = (th - sh) / 2;

    let mut black = Vec::with_capacity(bpp);
    format.encode(Rgb888::BLACK, &mut black);

    for y in 0..th {
        let row_start = bytes.len();
        let inside_y = y >= oy && y < oy + sh;
        for x in 0..tw {
            if inside_y && x >= ox && x < ox + sw {
                let sx = ((x - ox) * fw / sw) as u32;
                let sy = ((y - oy) * fh / sh) as u32;
                format.encode(frame.at(sx, sy), &mut bytes);
            } else {
                bytes.extend_from_slice(&black);
            }
        }
        bytes.resize(row_start + stride, 0);
    }

    DeviceFrame {
        resolution: target,
        format,
        stride,
        bytes,
    }
}
