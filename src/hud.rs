//! Info overlay text and frame-rate measurement.

use std::time::{Duration, Instant};

use crate::viewport::Readout;

const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Coordinates and zoom, one per line.
pub fn readout_text(readout: &Readout) -> String {
    format!(
        "X: {:.14}\nY: {:.14}\nZoom: {:.0}",
        readout.x, readout.y, readout.zoom
    )
}

pub fn info_text(readout: &Readout, fps: f64) -> String {
    format!("FPS: {fps:.2}\n{}", readout_text(readout))
}

/// Frames per second, refreshed once per elapsed second.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            window_start: start,
            frames: 0,
            fps: 0.0,
        }
    }

    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Count one frame at `now`.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= FPS_WINDOW {
            self.fps = self.frames as f64 / elapsed.as_secs_f64();
            self.frames = 0;
            self.window_start = now;
        }
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
