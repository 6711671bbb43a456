//! Drawing contract between the game and whatever backend shows it

use crate::Coords;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Green,
    Red,
    White,
    Yellow,
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::Green => crossterm::style::Color::Green,
            Color::Red => crossterm::style::Color::Red,
            Color::White => crossterm::style::Color::White,
            Color::Yellow => crossterm::style::Color::Yellow,
        }
    }
}

/// A 2D drawing area sized `width * cell_size` by `height * cell_size` pixels.
pub trait Surface {
    /// Erase the whole drawing area
    fn clear(&mut self);

    /// Fill grid cell `pos` with `color`
    fn draw_cell(&mut self, pos: Coords, color: Color);

    /// Render `text` with its baseline at pixel coordinates `(x, y)`
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color, size: u16);
}

#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum DrawCall {
        Clear,
        Cell(Coords, Color),
        Text(String, i32, i32, Color, u16),
    }

    /// Surface that remembers every call, for render assertions
    #[derive(Default)]
    pub struct RecordingSurface {
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn cells(&self) -> Vec<(Coords, Color)> {
            self.calls.iter().filter_map(|c| match c {
                DrawCall::Cell(pos, color) => Some((*pos, *color)),
                _ => None,
            }).collect()
        }

        pub fn texts(&self) -> Vec<&str> {
            self.calls.iter().filter_map(|c| match c {
                DrawCall::Text(text, ..) => Some(text.as_str()),
                _ => None,
            }).collect()
        }
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self) {
            self.calls.push(DrawCall::Clear);
        }

        fn draw_cell(&mut self, pos: Coords, color: Color) {
            self.calls.push(DrawCall::Cell(pos, color));
        }

        fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color, size: u16) {
            self.calls.push(DrawCall::Text(text.to_string(), x, y, color, size));
        }
    }
}
