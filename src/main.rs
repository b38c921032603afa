use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use particle_backdrop::cli::{Cli, Command, ContactArgs, RunArgs};
use particle_backdrop::config::BackdropConfig;
use particle_backdrop::contact::{
    self, ContactForm, FileIdentity, Identity, JsonFileStore, LogForwarder, StaticIdentity,
};
use particle_backdrop::core::{Clock, FpsCounter, Host, SurfaceRenderer};
use particle_backdrop::manager::{launch, BackdropState, TickOutcome};
use particle_backdrop::window::WinitHost;

const FPS_REPORT_INTERVAL: f32 = 1.0;

// === Application ===

struct App {
    config: BackdropConfig,
    window_id: String,
    initial_size: (u32, u32),
    host: WinitHost,
    state: Option<BackdropState<SurfaceRenderer>>,
    clock: Clock,
    fps: FpsCounter,
}

impl App {
    fn new(config: BackdropConfig, window_id: String, initial_size: (u32, u32)) -> Self {
        Self {
            config,
            window_id,
            initial_size,
            host: WinitHost::new(),
            state: None,
            clock: Clock::new(),
            fps: FpsCounter::new(FPS_REPORT_INTERVAL),
        }
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    fn shutdown(&mut self) {
        if let Some(BackdropState::Running(backdrop)) = self.state.take() {
            backdrop.release();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let (width, height) = self.initial_size;
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Particle Backdrop")
                .with_transparent(true)
                .with_inner_size(winit::dpi::LogicalSize::new(width, height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.host.register(self.window_id.clone(), window);

        let mut rng = self.rng();
        let state = launch(&mut self.host, &self.config, &mut rng);
        if !state.is_running() {
            // nothing else lives in this window
            event_loop.exit();
        }
        self.clock.reset();
        self.state = Some(state);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let viewport = self.host.viewport();
                if let Some(backdrop) = self.state.as_mut().and_then(BackdropState::backdrop_mut) {
                    backdrop.on_resize(viewport);
                }
            }
            WindowEvent::RedrawRequested => {
                let delta = self.clock.tick();
                if let Some(fps) = self.fps.frame(delta) {
                    log::debug!("FPS: {fps:.1}");
                }

                if let Some(backdrop) = self.state.as_mut().and_then(BackdropState::backdrop_mut) {
                    match backdrop.tick() {
                        Ok(TickOutcome::Continued) => {}
                        Ok(TickOutcome::Stopped) => log::trace!("Redraw after stop ignored"),
                        Err(e) => log::error!("Render error: {e}"),
                    }
                }
            }
            _ => {}
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => BackdropConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BackdropConfig::default(),
    };
    if let Some(surface_id) = args.surface_id {
        config.surface_id = surface_id;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let window_id = args.window_id.unwrap_or_else(|| config.surface_id.clone());

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, window_id, (args.width, args.height));

    log::info!("Particle Backdrop - Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}

fn submit_contact(args: ContactArgs) -> Result<()> {
    let form = ContactForm::new(args.name, args.email, args.message);
    let mut identity: Box<dyn Identity> = match args.user_id {
        Some(uid) => Box::new(StaticIdentity(uid)),
        None => Box::new(FileIdentity::new(args.store.join("identity"))),
    };
    let mut store = JsonFileStore::new(&args.store);
    let mut forwarder = LogForwarder {
        recipient: args.forward_to,
    };

    let submission = contact::submit(
        &form,
        &args.app_id,
        identity.as_mut(),
        &mut store,
        &mut forwarder,
    )?;

    log::info!(
        "Stored {} in {}",
        submission.document.id,
        submission.collection
    );
    println!("{}", submission.status);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match (cli.verbose, cli.quiet) {
        (0, true) => "error",
        (0, false) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(args) => run(args),
        Command::Contact(args) => submit_contact(args),
    }
}
