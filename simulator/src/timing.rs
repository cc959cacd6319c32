//! Timing for the simulator.
//!
//! These use `std::time` which is not available in `no_std` environments, so
//! they are defined here rather than in the common crate.

use std::time::{Duration, Instant};

/// Target frame time (~50 FPS). The main loop sleeps if a frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Pause between control-loop iterations while a capture is in flight.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Millisecond clock shared by the control loop and the sampling engine.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self { Self { start: Instant::now() } }

    /// Milliseconds since the clock was created.
    pub fn now_ms(&self) -> u64 { self.start.elapsed().as_millis() as u64 }
}
