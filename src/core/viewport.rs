/// Visible drawing area in logical pixels plus the host's pixel density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in logical pixels
    pub width: u32,
    /// Height in logical pixels
    pub height: u32,
    /// Physical pixels per logical pixel reported by the host
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Zero-sized viewports show up while a window is minimised
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Device pixel ratio clamped to `cap`
    pub fn pixel_ratio(&self, cap: f64) -> f64 {
        self.device_pixel_ratio.min(cap)
    }
}

/// Backing buffer size for a logical size at a given pixel ratio, never 0
pub fn buffer_size(width: u32, height: u32, pixel_ratio: f64) -> (u32, u32) {
    let scale = |v: u32| ((v as f64 * pixel_ratio).round() as u32).max(1);
    (scale(width), scale(height))
}
