use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::Level;

use crate::game::{FoodPlacement, LABELS};
use crate::term::text_fits;

pub const DEFAULT_WIDTH: i32 = 20;
pub const DEFAULT_HEIGHT: i32 = 20;
pub const DEFAULT_CELL_SIZE: i32 = 20;
pub const DEFAULT_TICK_MS: u64 = 125; // ~8 Hz

const GRID_RANGE: (i32, i32) = (4, 100);
const CELL_SIZE_RANGE: (i32, i32) = (2, 64);
const TICK_MS_RANGE: (u64, u64) = (20, 2000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange { name: &'static str, value: i64, min: i64, max: i64 },
    #[error("unknown log level '{0}'")]
    LogLevel(String),
    #[error("'{text}' does not fit a {width}x{height} grid with cell size {cell_size}")]
    TextDoesNotFit { text: String, width: i32, height: i32, cell_size: i32 },
}

#[derive(Debug, Parser)]
#[command(name = "snake")]
#[command(about = "Classic snake in the terminal")]
#[command(version)]
pub struct Cli {
    /// Grid width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: i32,

    /// Grid height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: i32,

    /// Pixels per cell, used to lay out text
    #[arg(long, default_value_t = DEFAULT_CELL_SIZE)]
    pub cell_size: i32,

    /// Milliseconds between game updates
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Seed for food placement (defaults to the current time)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Never place food on top of the snake
    #[arg(long)]
    pub avoid_snake: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Validated settings for one run of the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
    pub tick: Duration,
    pub seed: Option<u64>,
    pub food: FoodPlacement,
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            seed: None,
            food: FoodPlacement::Anywhere,
            log_file: None,
            log_level: Level::INFO,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        check_range("width", cli.width as i64, GRID_RANGE.0 as i64, GRID_RANGE.1 as i64)?;
        check_range("height", cli.height as i64, GRID_RANGE.0 as i64, GRID_RANGE.1 as i64)?;
        check_range("cell-size", cli.cell_size as i64, CELL_SIZE_RANGE.0 as i64, CELL_SIZE_RANGE.1 as i64)?;
        check_range("tick-ms", cli.tick_ms as i64, TICK_MS_RANGE.0 as i64, TICK_MS_RANGE.1 as i64)?;
        check_labels(cli.width, cli.height, cli.cell_size)?;

        let log_level = cli.log_level.parse::<Level>()
            .map_err(|_| ConfigError::LogLevel(cli.log_level.clone()))?;

        Ok(Config {
            width: cli.width,
            height: cli.height,
            cell_size: cli.cell_size,
            tick: Duration::from_millis(cli.tick_ms),
            seed: cli.seed,
            food: if cli.avoid_snake { FoodPlacement::AvoidSnake } else { FoodPlacement::Anywhere },
            log_file: cli.log_file,
            log_level,
        })
    }
}

/// Every prompt and score line must be fully visible, with room for the
/// largest score the grid allows
fn check_labels(width: i32, height: i32, cell_size: i32) -> Result<(), ConfigError> {
    let max_score = width * height;
    for label in LABELS {
        let text = if label.with_score {
            format!("{}{}", label.text, max_score)
        } else {
            label.text.to_string()
        };
        if !text_fits(&text, label.x, label.y, width, height, cell_size) {
            return Err(ConfigError::TextDoesNotFit { text, width, height, cell_size });
        }
    }
    Ok(())
}

fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange { name, value, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, ConfigError> {
        let cli = Cli::try_parse_from(std::iter::once("snake").chain(args.iter().copied()))
            .expect("arguments should parse");
        Config::try_from(cli)
    }

    #[test]
    fn defaults_match_the_classic_board() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tick, Duration::from_millis(125));
    }

    #[test]
    fn flags_are_applied() {
        let config = parse(&[
            "--width", "30", "--height", "13", "--seed", "7", "--avoid-snake",
            "--tick-ms", "200", "--log-level", "debug",
        ]).unwrap();
        assert_eq!(config.width, 30);
        assert_eq!(config.height, 13);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.food, FoodPlacement::AvoidSnake);
        assert_eq!(config.tick, Duration::from_millis(200));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(
            parse(&["--width", "3"]),
            Err(ConfigError::OutOfRange { name: "width", value: 3, min: 4, max: 100 })
        );
        assert!(matches!(parse(&["--height", "101"]), Err(ConfigError::OutOfRange { name: "height", .. })));
        assert!(matches!(parse(&["--tick-ms", "5"]), Err(ConfigError::OutOfRange { name: "tick-ms", .. })));
        assert!(matches!(parse(&["--cell-size", "1"]), Err(ConfigError::OutOfRange { name: "cell-size", .. })));
    }

    #[test]
    fn small_grid_that_hides_prompts_is_rejected() {
        assert_eq!(
            parse(&["--width", "10", "--height", "10"]),
            Err(ConfigError::TextDoesNotFit {
                text: "Press SPACE to Start".into(), width: 10, height: 10, cell_size: 20,
            })
        );
        assert!(matches!(parse(&["--width", "12", "--height", "12"]), Err(ConfigError::TextDoesNotFit { .. })));
    }

    #[test]
    fn small_cell_size_that_hides_prompts_is_rejected() {
        assert_eq!(
            parse(&["--cell-size", "2"]),
            Err(ConfigError::TextDoesNotFit {
                text: "snake game".into(), width: 20, height: 20, cell_size: 2,
            })
        );
    }

    #[test]
    fn larger_cells_allow_smaller_grids() {
        // At 40 px per cell every label sits at half the column and row
        assert!(parse(&["--width", "14", "--height", "10"]).is_err());
        let config = parse(&["--width", "14", "--height", "10", "--cell-size", "40"]).unwrap();
        assert_eq!((config.width, config.height), (14, 10));
    }

    #[test]
    fn accepted_configs_show_every_prompt() {
        use crate::game::{Engine, Key};
        use crate::term::TermManager;
        use rand::{rngs::StdRng, SeedableRng};

        for args in [&[][..], &["--width", "16", "--height", "13"][..], &["--width", "14", "--height", "10", "--cell-size", "40"][..]] {
            let config = parse(args).unwrap();
            let mut engine = Engine::with_rng(&config, StdRng::seed_from_u64(3));
            let mut term = TermManager::new(Vec::new(), config.width, config.height, config.cell_size);

            engine.on_tick(&mut term);
            assert_eq!(term.visible_lines(), vec!["snake game", "Press SPACE to Start"], "{:?}", args);

            // Run into the right wall, then look at the game over screen
            engine.on_key(Key::Start);
            while engine.state() != crate::game::GameState::Over {
                engine.on_tick(&mut term);
            }
            engine.on_tick(&mut term);
            let lines = term.visible_lines();
            assert_eq!(lines[0], "GAME OVER!", "{:?}", args);
            assert!(lines[1].starts_with("Score: "), "{:?}", args);
            assert_eq!(lines[2], "Press SPACE to Restart", "{:?}", args);
        }
    }

    #[test]
    fn bad_log_level_is_rejected() {
        assert_eq!(parse(&["--log-level", "loud"]), Err(ConfigError::LogLevel("loud".into())));
    }
}
