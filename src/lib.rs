pub mod camera;
pub mod cli;
pub mod config;
pub mod contact;
pub mod core;
pub mod error;
pub mod manager;
pub mod particles;
pub mod scene;
pub mod types;
pub mod window;

pub use config::BackdropConfig;
pub use error::{BackdropError, Result};
pub use manager::{launch, Backdrop, BackdropState, StopHandle, TickOutcome};
