use crate::Coords;
use crate::surface::{Color, Surface};
use std::io::{self, Write};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::{Attribute, SetAttribute, SetForegroundColor, ResetColor};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};

const CELL_CHARS: [char; 2] = ['█', '█'];
const BOLD_TEXT_SIZE: u16 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Glyph {
    ch: char,
    color: Option<Color>,
    bold: bool,
}

const BLANK: Glyph = Glyph { ch: ' ', color: None, bold: false };

/// Whether `text` drawn at pixel `(x, y)` lands wholly inside a
/// `width` x `height` field laid out with `cell_size`
pub fn text_fits(text: &str, x: i32, y: i32, width: i32, height: i32, cell_size: i32) -> bool {
    let (col, row) = text_origin(x, y, cell_size);
    let len = text.chars().count() as i32;
    col >= 0 && row >= 0 && row < height && col + len <= width * CELL_CHARS.len() as i32
}

/// Terminal position inside the field for a pixel coordinate
fn text_origin(x: i32, y: i32, cell_size: i32) -> Coords {
    let col = x * CELL_CHARS.len() as i32 / cell_size;
    let row = (y - 1).max(0) / cell_size;
    (col, row)
}

/// Terminal drawing surface. Each grid cell is two columns wide and one row
/// tall; the play field sits inside a one-character border at the top-left.
pub struct TermManager<W: Write> {
    out: W,
    width: i32,
    height: i32,
    cell_size: i32,
    screen: Vec<Glyph>,
}

impl<W: Write> TermManager<W> {
    pub fn new(out: W, width: i32, height: i32, cell_size: i32) -> Self {
        let screen = vec![BLANK; Self::columns(width) as usize * height as usize];
        TermManager { out, width, height, cell_size, screen }
    }

    /// Terminal size `(cols, rows)` needed for a field, border included
    pub fn required_size(width: i32, height: i32) -> (u16, u16) {
        ((Self::columns(width) + 2) as u16, (height + 2) as u16)
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.out, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()
    }

    pub fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.out, ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn draw_borders(&mut self) -> io::Result<()> {
        let end_x = (Self::columns(self.width) + 1) as u16;
        let end_y = (self.height + 1) as u16;

        queue!(self.out, ResetColor, terminal::Clear(terminal::ClearType::All))?;

        for x in 0..=end_x {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            queue!(self.out, cursor::MoveTo(x, 0), style::Print(ch))?;
            queue!(self.out, cursor::MoveTo(x, end_y), style::Print(ch))?;
        }

        for y in 1..end_y {
            queue!(self.out, cursor::MoveTo(0, y), style::Print('|'))?;
            queue!(self.out, cursor::MoveTo(end_x, y), style::Print('|'))?;
        }

        self.out.flush()
    }

    /// Writes the buffered frame to the terminal in one go
    pub fn flush(&mut self) -> io::Result<()> {
        let cols = Self::columns(self.width) as usize;

        for (row, line) in self.screen.chunks(cols).enumerate() {
            queue!(self.out, cursor::MoveTo(1, row as u16 + 1))?;
            for glyph in line {
                match glyph.color {
                    Some(color) => queue!(self.out, SetForegroundColor(color.into()))?,
                    None => queue!(self.out, ResetColor)?,
                }
                let attr = if glyph.bold {Attribute::Bold} else {Attribute::NormalIntensity};
                queue!(self.out, SetAttribute(attr), style::Print(glyph.ch))?;
            }
        }

        queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        self.out.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn columns(width: i32) -> i32 {
        width * CELL_CHARS.len() as i32
    }

    fn put(&mut self, (col, row): Coords, glyph: Glyph) {
        if col < 0 || row < 0 || col >= Self::columns(self.width) || row >= self.height {
            return;
        }
        let idx = row as usize * Self::columns(self.width) as usize + col as usize;
        self.screen[idx] = glyph;
    }

    /// Non-blank text of every row, top to bottom
    #[cfg(test)]
    pub(crate) fn visible_lines(&self) -> Vec<String> {
        self.screen.chunks(Self::columns(self.width) as usize)
            .map(|line| line.iter().map(|g| g.ch).collect::<String>().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }

    #[cfg(test)]
    fn glyph_at(&self, col: i32, row: i32) -> Glyph {
        self.screen[row as usize * Self::columns(self.width) as usize + col as usize]
    }
}

impl<W: Write> Surface for TermManager<W> {
    fn clear(&mut self) {
        self.screen.fill(BLANK);
    }

    fn draw_cell(&mut self, (x, y): Coords, color: Color) {
        for (i, ch) in CELL_CHARS.iter().enumerate() {
            let col = x * CELL_CHARS.len() as i32 + i as i32;
            self.put((col, y), Glyph { ch: *ch, color: Some(color), bold: false });
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color, size: u16) {
        let (col, row) = text_origin(x, y, self.cell_size);
        let bold = size >= BOLD_TEXT_SIZE;

        for (i, ch) in text.chars().enumerate() {
            self.put((col + i as i32, row), Glyph { ch, color: Some(color), bold });
        }
    }
}
