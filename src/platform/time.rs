//! Frame pacing

use std::time::{Duration, Instant};

/// Holds the loop to a target frame rate
#[derive(Debug, Clone)]
pub struct FramePacer {
    frame: Duration,
    last: Instant,
    paced: bool,
}

impl FramePacer {
    /// Sleep out the remainder of each frame
    pub fn new(fps: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            last: Instant::now(),
            paced: true,
        }
    }

    /// Never sleep; every frame reports the nominal duration
    pub fn unpaced(fps: u32) -> Self {
        Self {
            paced: false,
            ..Self::new(fps)
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Wait for the next frame boundary and return seconds since the last one
    pub fn wait(&mut self) -> f32 {
        if !self.paced {
            return self.frame.as_secs_f32();
        }

        let elapsed = self.last.elapsed();
        if elapsed < self.frame {
            std::thread::sleep(self.frame - elapsed);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt.as_secs_f32()
    }
}
