//! avatar-forge: parameterized avatar, favicon and decorative QR synthesis.

mod cache;
mod cli;
mod config;
mod core;
mod error;
mod logger;
mod ratelimit;
mod render;
mod schema;
mod utils;
mod validate;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::AppConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = AppConfig::load(&cli)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "loaded {}", path.display());
    }

    match &cli.command {
        Commands::Serve { .. } => cli::serve::bind_server(config)?.run(),
        Commands::Render { input, output } => {
            cli::render::render_file(&config, input, output.as_deref()).map(|_| ())
        }
    }
}
