use std::time::{Duration, Instant};

use crate::foundation::core::Fps;

/// Source of elapsed time for the frame loop.
pub trait FrameClock {
    /// Time since the run started.
    fn elapsed(&mut self) -> Duration;

    /// Block until `at` has elapsed. Clocks that are not tied to real time return immediately.
    fn wait_until(&mut self, at: Duration) {
        let _ = at;
    }
}

/// Monotonic wall clock; slow frames are caught up, never reordered.
#[derive(Clone, Debug)]
pub struct WallClock {
    started: Instant,
}

impl WallClock {
    /// Start counting now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl FrameClock for WallClock {
    fn elapsed(&mut self) -> Duration {
        self.started.elapsed()
    }

    fn wait_until(&mut self, at: Duration) {
        if let Some(rest) = at.checked_sub(self.started.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}

/// Advances exactly one frame per call, for offline rendering and tests.
#[derive(Clone, Debug)]
pub struct SteppedClock {
    fps: Fps,
    frame: u64,
}

impl SteppedClock {
    /// First call reports frame zero.
    pub fn new(fps: Fps) -> Self {
        Self { fps, frame: 0 }
    }
}

impl FrameClock for SteppedClock {
    fn elapsed(&mut self) -> Duration {
        let nanos = self.fps.nanos_for_frame(self.frame);
        self.frame += 1;
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
