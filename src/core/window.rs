use super::render_pipeline::{RenderSurface, SurfaceOptions};
use super::viewport::Viewport;
use crate::error::Result;

/// "Call me again before the next paint" primitive
pub trait FrameScheduler {
    /// Ask the host for one more frame callback
    fn request_frame(&self);
}

/// Hosting environment: owns drawing surfaces, viewport and frame callbacks
pub trait Host {
    /// Handle to a drawing surface found by identifier
    type Target;
    type Surface: RenderSurface;

    /// Resolve a drawing surface by identifier
    fn find_surface(&self, id: &str) -> Option<Self::Target>;

    /// Create a renderer bound to `target`
    fn create_surface(&mut self, target: &Self::Target, options: &SurfaceOptions)
        -> Result<Self::Surface>;

    /// Frame callback source tied to `target`
    fn frame_scheduler(&self, target: &Self::Target) -> Box<dyn FrameScheduler>;

    fn viewport(&self) -> Viewport;

    /// Hide the surface registered as `id`; unknown identifiers are ignored
    fn hide_surface(&mut self, id: &str);
}
