//! Linear framebuffer sink
//!
//! Used by the HDMI mirror path. The sink describes its geometry once at
//! open time and then accepts whole frames.

use thiserror::Error;

/// Byte order of multi-byte pixels in the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Least significant byte first
    #[default]
    Little,
    /// Most significant byte first
    Big,
}

impl ByteOrder {
    /// Byte order of the host CPU, which Linux framebuffers use
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

/// Geometry of a detected framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferInfo {
    /// Visible width in pixels
    pub width: u32,
    /// Visible height in pixels
    pub height: u32,
    /// Color depth
    pub bits_per_pixel: u16,
    /// Bytes per row, including padding
    pub line_length: usize,
    /// Pixel byte order
    pub byte_order: ByteOrder,
}

impl FramebufferInfo {
    /// Bytes per pixel, rounded up
    pub fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel as usize).div_ceil(8)
    }

    /// Total size of one frame in bytes
    pub fn frame_len(&self) -> usize {
        self.line_length * self.height as usize
    }
}

/// Framebuffer errors
#[derive(Debug, Error)]
pub enum FramebufferError {
    /// No framebuffer device present
    #[error("framebuffer {0} not present")]
    NotFound(String),
    /// Geometry could not be determined
    #[error("framebuffer detection failed: {0}")]
    Detection(String),
    /// Frame does not match the detected geometry
    #[error("frame is {actual} bytes, framebuffer expects {expected}")]
    Length {
        /// Expected byte count
        expected: usize,
        /// Received byte count
        actual: usize,
    },
    /// Device I/O failed
    #[error("framebuffer I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Framebuffer sink
pub trait Framebuffer {
    /// Geometry detected when the sink was opened
    fn info(&self) -> &FramebufferInfo;

    /// Write a complete frame starting at offset zero
    ///
    /// `bytes` must be exactly [`FramebufferInfo::frame_len`] long.
    fn write_frame(&mut self, bytes: &[u8]) -> Result<(), FramebufferError>;
}
