#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use particle_backdrop::camera::PerspectiveCamera;
use particle_backdrop::core::{FrameScheduler, Host, RenderSurface, SurfaceOptions, Viewport};
use particle_backdrop::error::{BackdropError, Result};
use particle_backdrop::scene::Scene;

/// Scheduler that only counts frame requests
pub struct CountingScheduler(pub Rc<Cell<usize>>);

impl FrameScheduler for CountingScheduler {
    fn request_frame(&self) {
        self.0.set(self.0.get() + 1);
    }
}

/// Surface that records what the backdrop asked of it
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub size: (u32, u32),
    pub ratio: f64,
    pub resizes: usize,
    pub prepared_instances: usize,
    pub renders: usize,
    pub released: Rc<Cell<bool>>,
    pub fail_render: bool,
    pub options: Option<SurfaceOptions>,
}

impl RenderSurface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32, ratio: f64) {
        self.size = (width, height);
        self.ratio = ratio;
        self.resizes += 1;
    }

    fn pixel_ratio(&self) -> f64 {
        self.ratio
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn prepare(&mut self, scene: &Scene) -> Result<()> {
        self.prepared_instances = scene.instances().len();
        Ok(())
    }

    fn render(&mut self, _scene: &Scene, _camera: &PerspectiveCamera) -> Result<()> {
        if self.fail_render {
            return Err(BackdropError::Surface("device lost".into()));
        }
        self.renders += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.released.set(true);
    }
}

/// In-memory host with a fixed set of surface identifiers
pub struct MockHost {
    pub surfaces: Vec<String>,
    pub viewport: Viewport,
    pub frames: Rc<Cell<usize>>,
    pub hidden: RefCell<Vec<String>>,
    pub released: Rc<Cell<bool>>,
    pub created: usize,
    pub fail_create: bool,
    pub fail_render: bool,
}

impl MockHost {
    pub fn with_surface(id: &str, width: u32, height: u32) -> Self {
        Self {
            surfaces: vec![id.to_string()],
            viewport: Viewport::new(width, height, 1.0),
            frames: Rc::new(Cell::new(0)),
            hidden: RefCell::new(Vec::new()),
            released: Rc::new(Cell::new(false)),
            created: 0,
            fail_create: false,
            fail_render: false,
        }
    }

    pub fn empty() -> Self {
        Self {
            surfaces: Vec::new(),
            ..Self::with_surface("unused", 800, 600)
        }
    }

    pub fn frames_requested(&self) -> usize {
        self.frames.get()
    }
}

impl Host for MockHost {
    type Target = String;
    type Surface = RecordingSurface;

    fn find_surface(&self, id: &str) -> Option<String> {
        self.surfaces.iter().find(|s| *s == id).cloned()
    }

    fn create_surface(&mut self, _target: &String, options: &SurfaceOptions)
        -> Result<RecordingSurface>
    {
        if self.fail_create {
            return Err(BackdropError::Gpu("no adapter".into()));
        }
        self.created += 1;
        Ok(RecordingSurface {
            options: Some(*options),
            fail_render: self.fail_render,
            released: self.released.clone(),
            ..Default::default()
        })
    }

    fn frame_scheduler(&self, _target: &String) -> Box<dyn FrameScheduler> {
        Box::new(CountingScheduler(self.frames.clone()))
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn hide_surface(&mut self, id: &str) {
        if self.find_surface(id).is_some() {
            self.hidden.borrow_mut().push(id.to_string());
        }
    }
}
