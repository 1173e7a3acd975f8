//! Linux framebuffer sink
//!
//! Geometry comes from sysfs (`/sys/class/graphics/fbN`), pixels are written
//! to `/dev/fbN` at offset zero with plain `write(2)`, so no mapping is kept
//! alive between frames.

use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use overhead_hal::{ByteOrder, Framebuffer, FramebufferError, FramebufferInfo};

/// Depth assumed when sysfs does not report one
const FALLBACK_BPP: u16 = 16;

/// Framebuffer device opened for writing
pub struct FbdevSink {
    file: File,
    path: PathBuf,
    info: FramebufferInfo,
}

impl FbdevSink {
    /// Open `/dev/<name>` using geometry from `/sys/class/graphics/<name>`
    ///
    /// # Arguments
    /// - `name`: device name, e.g. `fb0`
    pub fn open(name: &str) -> Result<Self, FramebufferError> {
        let sys = Path::new("/sys/class/graphics").join(name);
        let dev = Path::new("/dev").join(name);
        Self::open_at(&sys, &dev)
    }

    fn open_at(sys: &Path, dev: &Path) -> Result<Self, FramebufferError> {
        if !dev.exists() || !sys.exists() {
            return Err(FramebufferError::NotFound(dev.display().to_string()));
        }
        let info = detect(sys)?;
        let file = OpenOptions::new().write(true).open(dev)?;
        info!(
            "Framebuffer {}: {}x{} {} bpp, {} bytes/line",
            dev.display(),
            info.width,
            info.height,
            info.bits_per_pixel,
            info.line_length
        );
        Ok(Self {
            file,
            path: dev.to_path_buf(),
            info,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Framebuffer for FbdevSink {
    fn info(&self) -> &FramebufferInfo {
        &self.info
    }

    fn write_frame(&mut self, bytes: &[u8]) -> Result<(), FramebufferError> {
        let expected = self.info.frame_len();
        if bytes.len() != expected {
            return Err(FramebufferError::Length {
                expected,
                actual: bytes.len(),
            });
        }
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(bytes)?;
        Ok(())
    }
}

fn read_attr(sys: &Path, attr: &str) -> Option<String> {
    fs::read_to_string(sys.join(attr))
        .ok()
        .map(|s| s.trim().to_string())
}

/// Parse `virtual_size` ("1920,1080")
fn parse_size(text: &str) -> Option<(u32, u32)> {
    let (w, h) = text.split_once(',')?;
    let w = w.trim().parse().ok()?;
    let h = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

/// Read framebuffer geometry from its sysfs directory
fn detect(sys: &Path) -> Result<FramebufferInfo, FramebufferError> {
    let size = read_attr(sys, "virtual_size")
        .ok_or_else(|| FramebufferError::Detection("virtual_size unreadable".into()))?;
    let (width, height) = parse_size(&size)
        .ok_or_else(|| FramebufferError::Detection(format!("bad virtual_size '{}'", size)))?;

    let bits_per_pixel = match read_attr(sys, "bits_per_pixel").and_then(|s| s.parse().ok()) {
        Some(bpp) => bpp,
        None => {
            warn!("Framebuffer depth unknown, assuming {} bpp", FALLBACK_BPP);
            FALLBACK_BPP
        }
    };

    let packed = width as usize * (bits_per_pixel as usize).div_ceil(8);
    let line_length = read_attr(sys, "stride")
        .and_then(|s| s.parse().ok())
        .filter(|&stride: &usize| stride >= packed)
        .unwrap_or(packed);

    Ok(FramebufferInfo {
        width,
        height,
        bits_per_pixel,
        line_length,
        byte_order: ByteOrder::native(),
    })
}

/// Hide the text console cursor drawn over the HDMI output
///
/// Best effort: each step that fails is logged at debug and skipped.
pub fn hide_console_cursor() {
    let steps: [(&str, &[u8]); 3] = [
        ("/dev/tty1", b"\x1b[?25l\x1b[?1c"),
        ("/dev/tty0", b"\x1b[?25l"),
        ("/sys/class/graphics/fbcon/cursor_blink", b"0"),
    ];
    for (path, bytes) in steps {
        let result = OpenOptions::new()
            .write(true)
            .open(path)
            .and_then(|mut f| f.write_all(bytes));
        if let Err(e) = result {
            debug!("Could not write {}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("overhead-fb-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1920,1080"), Some((1920, 1080)));
        assert_eq!(parse_size(" 640 , 480 "), Some((640, 480)));
        assert_eq!(parse_size("0,480"), None);
        assert_eq!(parse_size("garbage"), None);
    }

    #[test]
    fn test_detect_full() {
        let sys = scratch("full");
        fs::write(sys.join("virtual_size"), "1920,1080\n").unwrap();
        fs::write(sys.join("bits_per_pixel"), "32\n").unwrap();
        fs::write(sys.join("stride"), "7680\n").unwrap();

        let info = detect(&sys).unwrap();
        assert_eq!((info.width, info.height), (1920, 1080));
        assert_eq!(info.bits_per_pixel, 32);
        assert_eq!(info.line_length, 7680);
        fs::remove_dir_all(&sys).unwrap();
    }

    #[test]
    fn test_detect_depth_fallback() {
        let sys = scratch("depth");
        fs::write(sys.join("virtual_size"), "800,480").unwrap();

        let info = detect(&sys).unwrap();
        assert_eq!(info.bits_per_pixel, 16);
        assert_eq!(info.line_length, 1600);
        fs::remove_dir_all(&sys).unwrap();
    }

    #[test]
    fn test_detect_without_size_fails() {
        let sys = scratch("nosize");
        assert!(matches!(detect(&sys), Err(FramebufferError::Detection(_))));
        fs::remove_dir_all(&sys).unwrap();
    }

    #[test]
    fn test_missing_device_is_not_found() {
        let result = FbdevSink::open_at(Path::new("/nonexistent/sys/fb9"), Path::new("/nonexistent/fb9"));
        assert!(matches!(result, Err(FramebufferError::NotFound(_))));
    }

    #[test]
    fn test_write_checks_length() {
        let sys = scratch("write");
        fs::write(sys.join("virtual_size"), "4,2").unwrap();
        fs::write(sys.join("bits_per_pixel"), "16").unwrap();
        let dev = sys.join("fb");
        fs::write(&dev, b"").unwrap();

        let mut sink = FbdevSink::open_at(&sys, &dev).unwrap();
        assert!(matches!(
            sink.write_frame(&[0; 3]),
            Err(FramebufferError::Length {
                expected: 16,
                actual: 3
            })
        ));
        sink.write_frame(&[7; 16]).unwrap();
        sink.write_frame(&[9; 16]).unwrap();
        assert_eq!(fs::read(&dev).unwrap(), vec![9; 16]);
        fs::remove_dir_all(&sys).unwrap();
    }
}
