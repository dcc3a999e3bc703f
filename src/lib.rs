//! mealsheet library root.
//! Exposes the CLI parser, the high-level run() function and the bot internals.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod sheets;
pub mod transport;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber; `RUST_LOG` wins over the configured level.
fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.log_level.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, dir: &Path) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(dir, cli.test),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg, dir),
        Commands::Run => cli::commands::run::handle(cfg),
        Commands::Link { .. } => cli::commands::link::handle(&cli.command, cfg),
        Commands::Status => cli::commands::status::handle(cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let dir = match &cli.home {
        Some(h) => utils::path::expand_tilde(h),
        None => Config::config_dir(),
    };

    // load config once
    let cfg = Config::load(&dir)?;
    init_tracing(&cfg);

    dispatch(&cli, &cfg, &dir)
}
