use anyhow::{Context, Result};
use arpet::{app, config};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "arpet")]
#[command(about = "Care for a virtual pet on a budget of daily points")]
struct Cli {
    /// Frame rate cap (overrides the saved setting)
    #[arg(long)]
    fps: Option<u32>,

    /// Force monochrome (no colors)
    #[arg(long, default_value_t = false)]
    mono: bool,

    /// Rules file (JSON). Defaults to rules.json in the data directory
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Log file. Defaults to arpet.log in the data directory
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = config::project_paths()?;
    let settings = config::load_settings(&paths.settings_path);

    init_logging(cli.log.as_deref().unwrap_or(&paths.log_path), &settings.log_level)?;

    let rules = config::load_rules(cli.rules.as_deref().unwrap_or(&paths.rules_path))?;

    let mut session = settings.clone();
    if let Some(fps) = cli.fps {
        session.fps_cap = fps;
    }
    if cli.mono {
        session.enable_color = false;
    }

    app::run(session, rules)?;
    config::save_settings_atomic(&paths.settings_path, &settings)?;
    Ok(())
}

fn init_logging(path: &Path, default_level: &str) -> Result<()> {
    // The terminal is in raw mode while running, so logs go to a file.
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
