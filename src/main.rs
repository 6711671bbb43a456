mod config;
mod game;
mod host;
mod snake;
mod surface;
mod term;

use std::fs::File;
use std::io::{stdout, Stdout};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use crate::config::{Cli, Config};
use crate::term::TermManager;

pub type Coords = (i32, i32);

fn main() -> Result<()> {
    let config = Config::try_from(Cli::parse()).context("invalid arguments")?;
    init_logging(&config)?;
    info!(?config, "starting");

    let (cols, rows) = crossterm::terminal::size().context("reading terminal size")?;
    let (need_cols, need_rows) = TermManager::<Stdout>::required_size(config.width, config.height);
    if cols < need_cols || rows < need_rows {
        bail!("terminal is {}x{}, a {}x{} grid needs at least {}x{}",
              cols, rows, config.width, config.height, need_cols, need_rows);
    }

    let mut engine = game::Engine::new(&config);

    let mut term = TermGuard(TermManager::new(stdout(), config.width, config.height, config.cell_size));
    term.0.setup().context("setting up the terminal")?;
    term.0.draw_borders().context("drawing the border")?;

    host::run(&mut engine, &mut term.0, config.tick).context("game loop failed")?;

    info!(score = engine.score(), "bye");
    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    // The terminal belongs to the game, so logs only ever go to a file
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Puts the terminal back however `main` exits
struct TermGuard(TermManager<Stdout>);

impl Drop for TermGuard {
    fn drop(&mut self) {
        if let Err(e) = self.0.restore() {
            warn!(error = %e, "failed to restore the terminal");
        }
    }
}
