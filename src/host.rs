use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::Rng;
use tracing::{info, trace};

use crate::game::{Engine, Key};
use crate::term::TermManager;

/// What a terminal key press means to the host
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Game(Key),
    Quit,
}

/// Drives the engine: one `on_tick` every `tick`, key presses in between.
/// Returns when the player quits.
pub fn run<R: Rng, W: Write>(engine: &mut Engine<R>, term: &mut TermManager<W>, tick: Duration) -> io::Result<()> {
    let mut next_tick = Instant::now();

    loop {
        let now = Instant::now();
        if now >= next_tick {
            engine.on_tick(term);
            term.flush()?;
            trace!(
                state = ?engine.state(),
                head = ?engine.snake().head(),
                heading = ?engine.direction(),
                food = ?engine.food(),
                "tick"
            );
            next_tick = next_deadline(next_tick, now, tick);
            continue;
        }

        if !poll(next_tick - now)? {
            continue;
        }

        if handle_event(engine, &read()?) == Flow::Quit {
            info!(score = engine.score(), state = ?engine.state(), "player quit");
            return Ok(());
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Deadline following `deadline`, which has just been served at `now`
fn next_deadline(deadline: Instant, now: Instant, tick: Duration) -> Instant {
    let next = deadline + tick;
    // Don't try to catch up after a stall
    if next < now {
        now + tick
    } else {
        next
    }
}

/// Feeds one terminal event to the engine
fn handle_event<R: Rng>(engine: &mut Engine<R>, event: &Event) -> Flow {
    let Event::Key(ev) = event else {
        return Flow::Continue;
    };

    match map_key(ev) {
        Some(Input::Quit) => Flow::Quit,
        Some(Input::Game(key)) => {
            engine.on_key(key);
            Flow::Continue
        }
        None => Flow::Continue,
    }
}

fn map_key(ev: &KeyEvent) -> Option<Input> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }

    let input = match ev {
        KeyEvent { code: KeyCode::Char('c'), modifiers, .. } if modifiers.contains(KeyModifiers::CONTROL) => Input::Quit,
        KeyEvent { code, .. } => match code {
            KeyCode::Esc | KeyCode::Char('q') => Input::Quit,
            KeyCode::Char('w') | KeyCode::Up => Input::Game(Key::Up),
            KeyCode::Char('a') | KeyCode::Left => Input::Game(Key::Left),
            KeyCode::Char('s') | KeyCode::Down => Input::Game(Key::Down),
            KeyCode::Char('d') | KeyCode::Right => Input::Game(Key::Right),
            KeyCode::Char(' ') => Input::Game(Key::Start),
            _ => Input::Game(Key::Other),
        }
    };

    Some(input)
}
