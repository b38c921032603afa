use std::collections::HashMap;
use std::sync::Arc;

use winit::window::Window;

use crate::core::{FrameScheduler, Host, SurfaceOptions, SurfaceRenderer, Viewport};
use crate::error::Result;

/// Logical viewport of a winit window
pub fn viewport_of(window: &Window) -> Viewport {
    let scale = window.scale_factor();
    let logical = window.inner_size().to_logical::<u32>(scale);
    Viewport::new(logical.width, logical.height, scale)
}

/// Frame callbacks through `Window::request_redraw`
pub struct RedrawScheduler {
    window: Arc<Window>,
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&self) {
        self.window.request_redraw();
    }
}

/// Native host: winit windows registered under string identifiers
///
/// The first registered window acts as the viewport, the way a page's
/// inner size does for every canvas on it.
#[derive(Default)]
pub struct WinitHost {
    windows: HashMap<String, Arc<Window>>,
    primary: Option<Arc<Window>>,
}

impl WinitHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, window: Arc<Window>) {
        let id = id.into();
        log::debug!("Registered window `{id}`");
        if self.primary.is_none() {
            self.primary = Some(window.clone());
        }
        self.windows.insert(id, window);
    }

    pub fn window(&self, id: &str) -> Option<&Arc<Window>> {
        self.windows.get(id)
    }
}

impl Host for WinitHost {
    type Target = Arc<Window>;
    type Surface = SurfaceRenderer;

    fn find_surface(&self, id: &str) -> Option<Arc<Window>> {
        self.windows.get(id).cloned()
    }

    fn create_surface(&mut self, target: &Arc<Window>, options: &SurfaceOptions)
        -> Result<SurfaceRenderer>
    {
        SurfaceRenderer::new(target.clone(), options)
    }

    fn frame_scheduler(&self, target: &Arc<Window>) -> Box<dyn FrameScheduler> {
        Box::new(RedrawScheduler {
            window: target.clone(),
        })
    }

    fn viewport(&self) -> Viewport {
        self.primary
            .as_deref()
            .map(viewport_of)
            .unwrap_or_else(|| Viewport::new(0, 0, 1.0))
    }

    fn hide_surface(&mut self, id: &str) {
        if let Some(window) = self.windows.get(id) {
            log::debug!("Hiding window `{id}`");
            window.set_visible(false);
        }
    }
}
