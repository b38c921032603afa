use crate::camera::PerspectiveCamera;
use crate::error::Result;
use crate::scene::Scene;

/// Options a renderer is created with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    /// Let whatever is behind the surface show through
    pub transparent: bool,
    /// RGBA clear colour, straight alpha
    pub clear_color: [f64; 4],
}

/// Binds a scene and camera to an output surface
pub trait RenderSurface {
    /// Resize the output to a logical size at `ratio` physical pixels per
    /// logical pixel, reallocating the backing buffer at most once
    fn resize(&mut self, width: u32, height: u32, ratio: f64);

    fn pixel_ratio(&self) -> f64;

    /// Logical size last passed to `resize`
    fn size(&self) -> (u32, u32);

    /// Upload the parts of the scene that never change
    fn prepare(&mut self, scene: &Scene) -> Result<()>;

    /// Draw one frame of `scene` as seen from `camera`
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()>;

    /// Drop GPU resources; later renders are no-ops
    fn release(&mut self) {}
}
