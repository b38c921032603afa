// manager.rs - Scene manager and viewport responder
//
// A `Backdrop` owns everything one running background needs: scene, camera,
// renderer and animation loop. Hosts drive it with `tick()` on every frame
// callback and `on_resize()` on every viewport change.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;

use crate::camera::PerspectiveCamera;
use crate::config::BackdropConfig;
use crate::core::{FrameScheduler, Host, RenderSurface, SurfaceOptions, Viewport};
use crate::error::{BackdropError, Result};
use crate::scene::Scene;

/// Cancels an animation loop from anywhere holding a clone
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        !self.0.load(Ordering::Acquire)
    }
}

/// Self-rescheduling frame loop with an explicit stop flag
pub struct AnimationLoop {
    running: Arc<AtomicBool>,
    ticks: u64,
    scheduler: Box<dyn FrameScheduler>,
}

impl AnimationLoop {
    pub fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            ticks: 0,
            scheduler,
        }
    }

    /// Mark the loop running and request the first frame
    pub fn start(&mut self) {
        self.running.store(true, Ordering::Release);
        self.scheduler.request_frame();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.running.clone())
    }

    /// Number of ticks whose frame rendered successfully
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn schedule_next(&self) {
        self.scheduler.request_frame();
    }

    fn complete_tick(&mut self) {
        self.ticks += 1;
    }
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Scene advanced, redrawn and the next frame requested
    Continued,
    /// Loop was stopped; nothing touched
    Stopped,
}

/// A constructed, animating particle background
pub struct Backdrop<S: RenderSurface> {
    scene: Scene,
    camera: PerspectiveCamera,
    surface: S,
    animation: AnimationLoop,
    rotation_step: f32,
    max_pixel_ratio: f64,
}

impl<S: RenderSurface> Backdrop<S> {
    /// Build the scene on the surface registered as `config.surface_id`
    /// and start animating
    pub fn initialize<H, R>(host: &mut H, config: &BackdropConfig, rng: &mut R) -> Result<Self>
    where
        H: Host<Surface = S>,
        R: Rng + ?Sized,
    {
        config.validate()?;

        let target = host
            .find_surface(&config.surface_id)
            .ok_or_else(|| BackdropError::SurfaceNotFound(config.surface_id.clone()))?;

        let options = SurfaceOptions {
            transparent: true,
            clear_color: config.clear_color,
        };
        let surface = host.create_surface(&target, &options)?;
        let scheduler = host.frame_scheduler(&target);

        let viewport = host.viewport();
        let aspect = if viewport.is_empty() { 1.0 } else { viewport.aspect() };
        let camera = PerspectiveCamera::new(&config.camera, aspect);
        let scene = Scene::build(config, rng);

        let mut backdrop = Self {
            scene,
            camera,
            surface,
            animation: AnimationLoop::new(scheduler),
            rotation_step: config.rotation_step,
            max_pixel_ratio: config.max_pixel_ratio,
        };

        backdrop.on_resize(viewport);
        backdrop.surface.prepare(&backdrop.scene)?;
        backdrop.animation.start();

        log::info!(
            "Backdrop running on `{}`: {} particles, {}x{} @ {}x",
            config.surface_id,
            backdrop.scene.group.len(),
            viewport.width,
            viewport.height,
            backdrop.surface.pixel_ratio()
        );

        Ok(backdrop)
    }

    /// One animation frame: reschedule, rotate the group, redraw
    pub fn tick(&mut self) -> Result<TickOutcome> {
        if !self.animation.is_running() {
            return Ok(TickOutcome::Stopped);
        }

        self.animation.schedule_next();
        self.scene.group.advance(self.rotation_step);
        self.surface.render(&self.scene, &self.camera)?;
        self.animation.complete_tick();

        Ok(TickOutcome::Continued)
    }

    /// Match camera projection and output size to a new viewport
    pub fn on_resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            log::debug!("Ignoring resize to empty viewport {}x{}", viewport.width, viewport.height);
            return;
        }

        self.camera.set_aspect(viewport.aspect());
        self.camera.update_projection_matrix();
        self.surface.resize(
            viewport.width,
            viewport.height,
            viewport.pixel_ratio(self.max_pixel_ratio),
        );
    }

    pub fn stop(&self) {
        self.animation.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.animation.stop_handle()
    }

    pub fn is_running(&self) -> bool {
        self.animation.is_running()
    }

    /// Stop animating and give the drawing surface back
    pub fn release(mut self) {
        self.animation.stop();
        self.surface.release();
        log::debug!("Backdrop released after {} ticks", self.animation.ticks());
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn animation(&self) -> &AnimationLoop {
        &self.animation
    }
}

/// Outcome of launching a backdrop
pub enum BackdropState<S: RenderSurface> {
    Running(Backdrop<S>),
    /// Terminal: nothing was kept and no loop runs
    Disabled(BackdropError),
}

impl<S: RenderSurface> BackdropState<S> {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }

    pub fn backdrop_mut(&mut self) -> Option<&mut Backdrop<S>> {
        match self {
            Self::Running(backdrop) => Some(backdrop),
            Self::Disabled(_) => None,
        }
    }
}

/// Initialize a backdrop; on failure log it and hide the surface so the
/// rest of the application carries on without the decoration
pub fn launch<H, R>(host: &mut H, config: &BackdropConfig, rng: &mut R) -> BackdropState<H::Surface>
where
    H: Host,
    R: Rng + ?Sized,
{
    match Backdrop::<H::Surface>::initialize(host, config, rng) {
        Ok(backdrop) => BackdropState::Running(backdrop),
        Err(err) => {
            log::error!("Particle background disabled: {err}");
            host.hide_surface(&config.surface_id);
            BackdropState::Disabled(err)
        }
    }
}
