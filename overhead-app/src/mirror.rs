//! HDMI mirror
//!
//! Duplicates each logical frame onto a linear framebuffer, letterboxed to
//! the sink's resolution. Mirror failures never affect the panel.

use tracing::{debug, info, warn};

use overhead_core::geometry::Resolution;
use overhead_display::{letterbox, LogicalFrame, PixelFormat};
use overhead_hal::{ByteOrder, Framebuffer, FramebufferError, FramebufferInfo};

/// Encoding for a framebuffer depth and byte order
pub fn format_for(info: &FramebufferInfo) -> Option<PixelFormat> {
    match (info.bits_per_pixel, info.byte_order) {
        (16, ByteOrder::Little) => Some(PixelFormat::Rgb565Le),
        (16, ByteOrder::Big) => Some(PixelFormat::Rgb565Be),
        (24, ByteOrder::Little) => Some(PixelFormat::Bgr888),
        (24, ByteOrder::Big) => Some(PixelFormat::Rgb888),
        (32, ByteOrder::Little) => Some(PixelFormat::Bgra8888),
        _ => None,
    }
}

/// Build a mirror from an opened sink, logging why there is none
///
/// `on_attach` runs only when a mirror is created.
pub fn attach<F: Framebuffer>(
    opened: Result<F, FramebufferError>,
    on_attach: impl FnOnce(),
) -> Option<Mirror<F>> {
    match opened.and_then(Mirror::new) {
        Ok(mirror) => {
            on_attach();
            Some(mirror)
        }
        Err(FramebufferError::NotFound(dev)) => {
            info!("No framebuffer at {}, HDMI mirror disabled", dev);
            None
        }
        Err(e) => {
            warn!("HDMI mirror disabled: {}", e);
            None
        }
    }
}

/// Letterboxing writer for one framebuffer
pub struct Mirror<F> {
    sink: F,
    target: Resolution,
    format: PixelFormat,
    /// Consecutive write failures
    failures: u32,
}

impl<F: Framebuffer> Mirror<F> {
    /// Wrap a detected framebuffer
    pub fn new(sink: F) -> Result<Self, FramebufferError> {
        let info = *sink.info();
        let format = format_for(&info).ok_or_else(|| {
            FramebufferError::Detection(format!(
                "unsupported depth {} bpp ({:?} endian)",
                info.bits_per_pixel, info.byte_order
            ))
        })?;
        info!(
            "HDMI mirror {}x{} as {:?}",
            info.width, info.height, format
        );
        Ok(Self {
            sink,
            target: Resolution::new(info.width, info.height),
            format,
            failures: 0,
        })
    }

    /// Letterbox and write one frame
    ///
    /// Returns whether the write succeeded. The first failure in a run is
    /// logged at warn, the rest at debug.
    pub fn write(&mut self, frame: &LogicalFrame) -> bool {
        let stride = self.sink.info().line_length;
        let device = letterbox(frame, self.target, self.format, stride);
        match self.sink.write_frame(device.as_bytes()) {
            Ok(()) => {
                if self.failures > 0 {
                    info!("HDMI mirror recovered after {} failures", self.failures);
                }
                self.failures = 0;
                true
            }
            Err(e) => {
                self.failures += 1;
                if self.failures == 1 {
                    warn!("HDMI mirror write failed: {}", e);
                } else {
                    debug!("HDMI mirror write failed ({} in a row): {}", self.failures, e);
                }
                false
            }
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn sink(&self) -> &F {
        &self.sink
    }
}
