// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;

#[derive(Parser, Debug, Clone)]
#[command(name = "particle-backdrop")]
#[command(about = "Animated 3D particle background", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Open a window and animate the particle background (default)
    Run(RunArgs),
    /// Submit the contact form
    Contact(ContactArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// JSON config file; unset fields keep their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Identifier of the drawing surface the scene binds to
    #[arg(long)]
    pub surface_id: Option<String>,

    /// Identifier the window is registered under (defaults to the surface id)
    #[arg(long)]
    pub window_id: Option<String>,

    /// Seed for a reproducible particle layout
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: None,
            surface_id: None,
            window_id: None,
            seed: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ContactArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub message: String,

    /// Directory documents are stored under
    #[arg(long, default_value = "contact-store")]
    pub store: PathBuf,

    /// Application namespace inside the store
    #[arg(long, default_value = "particle-backdrop")]
    pub app_id: String,

    /// Use this visitor id instead of the persisted anonymous one
    #[arg(long)]
    pub user_id: Option<String>,

    /// Inbox the message is forwarded to
    #[arg(long, default_value = "inbox@localhost")]
    pub forward_to: String,
}
