//! Long-running tasks
//!
//! - `feed`: one async task per collaborator, publishing snapshots
//! - `render`: the blocking tick loop that owns every output device
//! - `supervise`: waiting for whatever ends the run

mod feed;
mod render;
mod supervise;

pub use feed::{run_flight_feed, run_weather_feed, FlightFeedSettings};
pub use render::{run_render_loop, Pacer};
pub use supervise::{wait_for_stop, Stop};
