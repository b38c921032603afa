use std::time::Instant;

/// Wall-clock time between redraws, fed to the FPS counter
#[derive(Debug)]
pub struct Clock {
    last: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }

    /// Seconds since the previous call (or since creation/reset)
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = (now - self.last).as_secs_f32();
        self.last = now;
        delta
    }

    /// Restart timing, e.g. once the first frame is scheduled
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Averages frame rate over a reporting window
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    window: f32,
    elapsed: f32,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    /// Report once every `window` seconds
    pub fn new(window: f32) -> Self {
        Self {
            window,
            elapsed: 0.0,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count one frame; returns the fresh average when a window closes
    pub fn frame(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed < self.window {
            return None;
        }

        self.fps = self.frames as f32 / self.elapsed;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(self.fps)
    }

    /// Last reported average
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
