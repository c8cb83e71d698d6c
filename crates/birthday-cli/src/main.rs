//! Birthday Book
//!
//! Interactive command-line manager for a small book of birthdays.

use anyhow::{Context, Result};
use birthday_cli::{repl, Console, Manager};
use birthday_core::BookConfig;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "birthday-book")]
#[command(about = "Keep track of birthdays, ages and upcoming celebrations")]
#[command(version)]
struct Cli {
    /// Birthday file to load at startup
    file: Option<PathBuf>,

    /// Configuration file (default: ~/.birthday-book/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Echo each command line before running it
    #[arg(long)]
    echo: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BookConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BookConfig::load(),
    };
    if cli.echo {
        config.echo = true;
    }

    // Logs go to stderr so the session transcript on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    tracing::info!("Starting birthday book v{}", env!("CARGO_PKG_VERSION"));

    let startup_file = cli.file.or_else(|| config.autoload.clone());
    let console = Console::new(io::stdin().lock(), io::stdout().lock());
    let mut manager = Manager::new(config, console);

    if let Some(path) = startup_file {
        if let Err(e) = manager.load_file(&path) {
            manager.report(&e)?;
        }
    }

    repl::run(&mut manager).context("Session ended with an I/O error")?;

    Ok(())
}
