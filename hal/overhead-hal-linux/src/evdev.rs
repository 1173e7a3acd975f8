//! evdev touch sensor
//!
//! Reads `input_event` records from `/dev/input/eventN` without blocking.
//! The kernel groups axis and button updates into packets terminated by
//! `SYN_REPORT`; each packet becomes one [`RawTouch`] sample.
//!
//! # Record layout
//!
//! ```text
//! struct input_event {
//!     struct timeval time;   // platform width
//!     __u16 type;
//!     __u16 code;
//!     __s32 value;
//! };
//! ```

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::mem::size_of;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use overhead_hal::{RawTouch, TouchReadError, TouchSensor};

/// Event types and codes from `linux/input-event-codes.h`
mod codes {
    pub const EV_SYN: u16 = 0x00;
    pub const EV_KEY: u16 = 0x01;
    pub const EV_ABS: u16 = 0x03;

    pub const SYN_REPORT: u16 = 0x00;

    pub const ABS_X: u16 = 0x00;
    pub const ABS_Y: u16 = 0x01;
    pub const ABS_PRESSURE: u16 = 0x18;

    pub const BTN_TOUCH: u16 = 0x14a;
}

const TIMEVAL_LEN: usize = size_of::<libc::timeval>();
const EVENT_LEN: usize = TIMEVAL_LEN + 8;

/// Records read per `read(2)`
const READ_BATCH: usize = 64;

/// Queued packets kept between polls; older ones are dropped
const MAX_PENDING: usize = 256;

/// Device names that identify a touch controller
const TOUCH_NAMES: [&str; 2] = ["touch", "ads7846"];

/// Nodes tried when no device advertises a touch name
const FALLBACK_NODES: [&str; 3] = [
    "/dev/input/touchscreen",
    "/dev/input/event0",
    "/dev/input/event1",
];

/// One decoded `input_event`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InputEvent {
    kind: u16,
    code: u16,
    value: i32,
}

fn parse_event(record: &[u8]) -> Option<InputEvent> {
    let body = record.get(TIMEVAL_LEN..EVENT_LEN)?;
    Some(InputEvent {
        kind: u16::from_ne_bytes(body[0..2].try_into().ok()?),
        code: u16::from_ne_bytes(body[2..4].try_into().ok()?),
        value: i32::from_ne_bytes(body[4..8].try_into().ok()?),
    })
}

/// Contact state accumulated from events
#[derive(Debug, Clone, Copy, Default)]
struct Contact {
    x: u16,
    y: u16,
    touching: bool,
}

impl Contact {
    /// Apply one event; returns a sample at the end of a packet
    fn apply(&mut self, event: InputEvent) -> Option<RawTouch> {
        let axis = |v: i32| v.clamp(0, u16::MAX as i32) as u16;
        match (event.kind, event.code) {
            (codes::EV_ABS, codes::ABS_X) => self.x = axis(event.value),
            (codes::EV_ABS, codes::ABS_Y) => self.y = axis(event.value),
            (codes::EV_ABS, codes::ABS_PRESSURE) => self.touching = event.value > 0,
            (codes::EV_KEY, codes::BTN_TOUCH) => self.touching = event.value != 0,
            (codes::EV_SYN, codes::SYN_REPORT) => {
                return Some(RawTouch {
                    x: self.x,
                    y: self.y,
                    pressed: self.touching,
                })
            }
            _ => {}
        }
        None
    }
}

/// Non-blocking evdev touch sensor
pub struct EvdevTouch<R = File> {
    source: R,
    path: PathBuf,
    contact: Contact,
    pending: VecDeque<RawTouch>,
    /// Bytes of a record split across reads
    partial: Vec<u8>,
}

impl EvdevTouch<File> {
    /// Open a specific event node
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)?;
        info!("Touch input on {}", path.display());
        Ok(Self::from_source(file, path.to_path_buf()))
    }

    /// Open the configured node, or find one by device name
    pub fn open_or_discover(configured: Option<&str>) -> io::Result<Self> {
        match configured {
            Some(path) => Self::open(path),
            None => match discover() {
                Some(path) => Self::open(path),
                None => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no touch input device found",
                )),
            },
        }
    }
}

impl<R: Read> EvdevTouch<R> {
    fn from_source(source: R, path: PathBuf) -> Self {
        Self {
            source,
            path,
            contact: Contact::default(),
            pending: VecDeque::new(),
            partial: Vec::with_capacity(EVENT_LEN),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read whatever the kernel has queued
    fn fill(&mut self) -> Result<(), TouchReadError> {
        let mut buf = [0u8; READ_BATCH * EVENT_LEN];
        loop {
            let n = match self.source.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            self.partial.extend_from_slice(&buf[..n]);
            let whole = self.partial.len() - self.partial.len() % EVENT_LEN;
            for record in self.partial[..whole].chunks_exact(EVENT_LEN) {
                let event = parse_event(record).ok_or(TouchReadError::Malformed)?;
                if let Some(sample) = self.contact.apply(event) {
                    if self.pending.len() == MAX_PENDING {
                        self.pending.pop_front();
                    }
                    self.pending.push_back(sample);
                }
            }
            self.partial.drain(..whole);

            if n < buf.len() {
                return Ok(());
            }
        }
    }
}

impl<R: Read> TouchSensor for EvdevTouch<R> {
    fn read_raw(&mut self) -> Result<Option<RawTouch>, TouchReadError> {
        if self.pending.is_empty() {
            self.fill()?;
        }
        Ok(self.pending.pop_front())
    }
}

/// Find a touch controller's event node
pub fn discover() -> Option<PathBuf> {
    discover_in(Path::new("/sys/class/input"), Path::new("/dev/input")).or_else(|| {
        FALLBACK_NODES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    })
}

/// Match `event*` entries under `sys_root` by their device name
fn discover_in(sys_root: &Path, dev_root: &Path) -> Option<PathBuf> {
    let mut nodes: Vec<String> = fs::read_dir(sys_root)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with("event"))
        .collect();
    nodes.sort();

    nodes.into_iter().find_map(|node| {
        let name = fs::read_to_string(sys_root.join(&node).join("device/name")).ok()?;
        let name = name.trim().to_lowercase();
        if TOUCH_NAMES.iter().any(|t| name.contains(t)) {
            debug!("Touch device '{}' at {}", name, node);
            Some(dev_root.join(&node))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(kind: u16, code: u16, value: i32) -> Vec<u8> {
        let mut out = vec![0u8; TIMEVAL_LEN];
        out.extend_from_slice(&kind.to_ne_bytes());
        out.extend_from_slice(&code.to_ne_bytes());
        out.extend_from_slice(&value.to_ne_bytes());
        out
    }

    fn touch(bytes: Vec<u8>) -> EvdevTouch<Cursor<Vec<u8>>> {
        EvdevTouch::from_source(Cursor::new(bytes), PathBuf::from("test"))
    }

    fn packet(x: i32, y: i32, down: Option<bool>) -> Vec<u8> {
        let mut out = Vec::new();
        if let Some(down) = down {
            out.extend(record(codes::EV_KEY, codes::BTN_TOUCH, down as i32));
        }
        out.extend(record(codes::EV_ABS, codes::ABS_X, x));
        out.extend(record(codes::EV_ABS, codes::ABS_Y, y));
        out.extend(record(codes::EV_SYN, codes::SYN_REPORT, 0));
        out
    }

    #[test]
    fn test_event_size() {
        assert_eq!(EVENT_LEN, TIMEVAL_LEN + 8);
        let rec = record(codes::EV_ABS, codes::ABS_Y, 1234);
        assert_eq!(rec.len(), EVENT_LEN);
        assert_eq!(
            parse_event(&rec),
            Some(InputEvent {
                kind: codes::EV_ABS,
                code: codes::ABS_Y,
                value: 1234,
            })
        );
    }

    #[test]
    fn test_packets_become_samples() {
        let mut bytes = packet(100, 200, Some(true));
        bytes.extend(packet(110, 210, None));
        bytes.extend(packet(110, 210, Some(false)));
        let mut t = touch(bytes);

        assert_eq!(
            t.read_raw().unwrap(),
            Some(RawTouch {
                x: 100,
                y: 200,
                pressed: true
            })
        );
        assert_eq!(
            t.read_raw().unwrap(),
            Some(RawTouch {
                x: 110,
                y: 210,
                pressed: true
            })
        );
        assert!(!t.read_raw().unwrap().unwrap().pressed);
        assert_eq!(t.read_raw().unwrap(), None);
    }

    #[test]
    fn test_pressure_tracks_contact() {
        let mut bytes = record(codes::EV_ABS, codes::ABS_PRESSURE, 80);
        bytes.extend(record(codes::EV_SYN, codes::SYN_REPORT, 0));
        bytes.extend(record(codes::EV_ABS, codes::ABS_PRESSURE, 0));
        bytes.extend(record(codes::EV_SYN, codes::SYN_REPORT, 0));
        let mut t = touch(bytes);
        assert!(t.read_raw().unwrap().unwrap().pressed);
        assert!(!t.read_raw().unwrap().unwrap().pressed);
    }

    #[test]
    fn test_incomplete_packet_yields_nothing() {
        let mut t = touch(record(codes::EV_ABS, codes::ABS_X, 5));
        assert_eq!(t.read_raw().unwrap(), None);
    }

    #[test]
    fn test_negative_axis_clamped() {
        let mut t = touch(packet(-20, 70_000, Some(true)));
        let s = t.read_raw().unwrap().unwrap();
        assert_eq!((s.x, s.y), (0, u16::MAX));
    }

    #[test]
    fn test_discover_by_name() {
        let root = std::env::temp_dir().join(format!("overhead-evdev-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        for (node, name) in [("event0", "vc4-hdmi"), ("event3", "ADS7846 Touchscreen")] {
            let dir = root.join(node).join("device");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("name"), format!("{}\n", name)).unwrap();
        }

        let found = discover_in(&root, Path::new("/dev/input"));
        assert_eq!(found, Some(PathBuf::from("/dev/input/event3")));
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_discover_missing_root() {
        assert_eq!(
            discover_in(Path::new("/nonexistent/overhead"), Path::new("/dev/input")),
            None
        );
    }
}
