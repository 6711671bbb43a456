use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::Config;
use crate::snake::{Snake, Direction::{*, self}, MoveResult::*};
use crate::surface::{Color, Surface};
use crate::Coords;

const SNAKE_COLOR: Color = Color::Green;
const FOOD_COLOR: Color = Color::Red;

/// A piece of text the engine draws, positioned in surface pixels.
/// Score labels carry only their prefix; the score is appended when drawn.
#[derive(Clone, Copy, Debug)]
pub struct Label {
    pub text: &'static str,
    pub x: i32,
    pub y: i32,
    pub color: Color,
    pub size: u16,
    pub with_score: bool,
}

impl Label {
    const fn new(text: &'static str, x: i32, y: i32, color: Color, size: u16) -> Self {
        Label { text, x, y, color, size, with_score: false }
    }

    const fn scored(text: &'static str, x: i32, y: i32, color: Color, size: u16) -> Self {
        Label { text, x, y, color, size, with_score: true }
    }

    fn draw<S: Surface>(&self, surface: &mut S, score: u32) {
        if self.with_score {
            surface.draw_text(&format!("{}{}", self.text, score), self.x, self.y, self.color, self.size);
        } else {
            surface.draw_text(self.text, self.x, self.y, self.color, self.size);
        }
    }
}

const TITLE: Label = Label::new("snake game", 100, 180, Color::Green, 28);
const START_PROMPT: Label = Label::new("Press SPACE to Start", 120, 220, Color::White, 20);
const GAME_OVER: Label = Label::new("GAME OVER!", 100, 180, Color::Red, 28);
const FINAL_SCORE: Label = Label::scored("Score: ", 120, 220, Color::White, 20);
const RESTART_PROMPT: Label = Label::new("Press SPACE to Restart", 60, 260, Color::Yellow, 20);
const SCORE_OVERLAY: Label = Label::scored("Score: ", 5, 20, Color::White, 16);

/// Every label the engine can draw
pub const LABELS: [Label; 6] = [TITLE, START_PROMPT, GAME_OVER, FINAL_SCORE, RESTART_PROMPT, SCORE_OVERLAY];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    Running,
    Over,
}

/// Input the engine understands. The host maps physical keys onto it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Left,
    Up,
    Right,
    Down,
    Start,
    Other,
}

/// How food picks its cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FoodPlacement {
    /// Any cell of the grid, including ones under the snake.
    Anywhere,
    /// Only cells not covered by the snake, when there are any.
    AvoidSnake,
}

pub struct Engine<R = StdRng> {
    width: i32,
    height: i32,
    snake: Snake,
    direction: Direction,
    // Heading used by the most recent step
    moved: Direction,
    food: Coords,
    score: u32,
    state: GameState,
    placement: FoodPlacement,
    rng: R,
}

impl Engine<StdRng> {
    /// Engine whose food source is seeded once, from `config.seed` or the clock.
    pub fn new(config: &Config) -> Self {
        let seed = config.seed.unwrap_or_else(seed_from_clock);
        debug!(seed, "seeding food placement");
        Engine::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(config: &Config, rng: R) -> Self {
        let start = start_cell(config.width, config.height);
        let mut engine = Engine {
            width: config.width,
            height: config.height,
            snake: Snake::new(start),
            direction: Right,
            moved: Right,
            food: start,
            score: 0,
            state: GameState::NotStarted,
            placement: config.food,
            rng,
        };
        engine.food = engine.roll_food();
        engine
    }

    pub fn reset(&mut self) {
        self.snake = Snake::new(start_cell(self.width, self.height));
        self.direction = Right;
        self.moved = Right;
        self.food = self.roll_food();
        self.score = 0;
        self.state = GameState::Running;

        info!(food = ?self.food, "new run");
    }

    pub fn on_key(&mut self, key: Key) {
        let candidate = match key {
            Key::Left => Left,
            Key::Up => Up,
            Key::Right => Right,
            Key::Down => Down,
            Key::Start => {
                if self.state != GameState::Running {
                    self.reset();
                }
                return;
            }
            Key::Other => return,
        };

        if candidate == self.direction.opposite() || candidate == self.moved.opposite() {
            return;
        }

        self.direction = candidate;
    }

    /// Advances the game one step and draws the resulting frame.
    pub fn on_tick<S: Surface>(&mut self, surface: &mut S) {
        surface.clear();

        match self.state {
            GameState::NotStarted => {
                TITLE.draw(surface, self.score);
                START_PROMPT.draw(surface, self.score);
                return;
            }
            GameState::Over => {
                GAME_OVER.draw(surface, self.score);
                FINAL_SCORE.draw(surface, self.score);
                RESTART_PROMPT.draw(surface, self.score);
                return;
            }
            GameState::Running => {}
        }

        let new_head = match self.snake.advance(self.direction, self.width, self.height) {
            Moved { new_head } => new_head,
            HitWall => return self.game_over("wall"),
            HitSelf => return self.game_over("self"),
        };
        self.moved = self.direction;

        if new_head == self.food {
            self.score += 1;
            self.food = self.roll_food();
            debug!(score = self.score, len = self.snake.len(), food = ?self.food, "ate food");
        } else {
            self.snake.drop_tail();
        }

        for pos in self.snake.body() {
            surface.draw_cell(*pos, SNAKE_COLOR);
        }
        surface.draw_cell(self.food, FOOD_COLOR);
        SCORE_OVERLAY.draw(surface, self.score);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Coords {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_over(&mut self, cause: &str) {
        self.state = GameState::Over;
        info!(score = self.score, len = self.snake.len(), cause, "game over");
    }

    fn roll_food(&mut self) -> Coords {
        if self.placement == FoodPlacement::AvoidSnake {
            let free: Vec<Coords> = (0..self.height)
                .flat_map(|y| (0..self.width).map(move |x| (x, y)))
                .filter(|pos| !self.snake.contains(pos))
                .collect();

            if let Some(pos) = free.choose(&mut self.rng) {
                return *pos;
            }
            debug!("no free cell left for food");
        }

        (self.rng.gen_range(0..self.width), self.rng.gen_range(0..self.height))
    }
}

fn start_cell(width: i32, height: i32) -> Coords {
    (width / 2, height / 2)
}

fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
