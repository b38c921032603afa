pub mod clock;
pub mod gpu_context;
pub mod render_pipeline;
pub mod surface_renderer;
pub mod viewport;
pub mod window;

pub use clock::{Clock, FpsCounter};
pub use gpu_context::GpuContext;
pub use render_pipeline::{RenderSurface, SurfaceOptions};
pub use surface_renderer::SurfaceRenderer;
pub use viewport::{buffer_size, Viewport};
pub use window::{FrameScheduler, Host};
