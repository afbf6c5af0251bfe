//! Text-mode screen
//!
//! Renders console glyphs into an 80x25 grid of CGA cells (low byte
//! character, high byte colour). The cursor lives behind [`CursorPort`] so the
//! same code drives the CRT controller on hardware and a plain counter in
//! tests. Output scrolls when the cursor reaches row 24.

use core::fmt;

use crate::config::{COLOR_NORMAL, COLOR_RECALLED, SCREEN_COLS, SCREEN_ROWS, SCROLL_ROW};

use super::output::{Attr, Display, Glyph};

const BLANK: u16 = b' ' as u16 | COLOR_NORMAL;

/// Display invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenError {
    /// The cursor ended up outside the screen
    PositionOutOfRange(usize),
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenError::PositionOutOfRange(_) => write!(f, "pos under/overflow"),
        }
    }
}

/// Hardware (or simulated) cursor position, as a cell index.
pub trait CursorPort {
    fn get(&mut self) -> usize;
    fn set(&mut self, pos: usize);
}

/// Cursor kept in memory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SoftCursor(pub usize);

impl CursorPort for SoftCursor {
    fn get(&mut self) -> usize {
        self.0
    }

    fn set(&mut self, pos: usize) {
        self.0 = pos;
    }
}

pub struct TextScreen<B, C> {
    cells: B,
    cursor: C,
}

impl<B, C> TextScreen<B, C>
where
    B: AsMut<[u16]> + AsRef<[u16]>,
    C: CursorPort,
{
    pub fn new(cells: B, cursor: C) -> Self {
        Self { cells, cursor }
    }

    pub fn cells(&self) -> &[u16] {
        self.cells.as_ref()
    }

    pub fn cursor(&mut self) -> usize {
        self.cursor.get()
    }

    fn scroll(cells: &mut [u16], pos: usize) -> usize {
        cells.copy_within(SCREEN_COLS..SCROLL_ROW * SCREEN_COLS, 0);
        let pos = pos - SCREEN_COLS;
        cells[pos..SCROLL_ROW * SCREEN_COLS].fill(0);
        pos
    }
}

impl<B, C> Display for TextScreen<B, C>
where
    B: AsMut<[u16]> + AsRef<[u16]>,
    C: CursorPort,
{
    fn put(&mut self, glyph: Glyph, attr: Attr) -> Result<(), ScreenError> {
        let cells = self.cells.as_mut();
        let mut pos = self.cursor.get();
        if pos >= SCREEN_ROWS * SCREEN_COLS || cells.len() < SCREEN_ROWS * SCREEN_COLS {
            return Err(ScreenError::PositionOutOfRange(pos));
        }

        let color = match attr {
            Attr::Normal => COLOR_NORMAL,
            Attr::Recalled => COLOR_RECALLED,
        };

        match glyph {
            Glyph::Byte(b'\n') => pos += SCREEN_COLS - pos % SCREEN_COLS,
            Glyph::Backspace => pos = pos.saturating_sub(1),
            Glyph::Byte(c) => {
                cells[pos] = c as u16 | color;
                pos += 1;
            }
        }

        if pos > SCREEN_ROWS * SCREEN_COLS {
            return Err(ScreenError::PositionOutOfRange(pos));
        }

        if pos / SCREEN_COLS >= SCROLL_ROW {
            pos = Self::scroll(cells, pos);
        }

        self.cursor.set(pos);
        cells[pos] = BLANK;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> TextScreen<Vec<u16>, SoftCursor> {
        TextScreen::new(vec![0u16; SCREEN_ROWS * SCREEN_COLS], SoftCursor(0))
    }

    #[test]
    fn test_put_byte_advances_cursor() {
        let mut s = screen();
        s.put(Glyph::Byte(b'h'), Attr::Normal).unwrap();
        s.put(Glyph::Byte(b'i'), Attr::Normal).unwrap();
        assert_eq!(s.cursor(), 2);
        assert_eq!(s.cells()[0], b'h' as u16 | COLOR_NORMAL);
        assert_eq!(s.cells()[1], b'i' as u16 | COLOR_NORMAL);
        assert_eq!(s.cells()[2], BLANK);
    }

    #[test]
    fn test_recalled_text_uses_history_colour() {
        let mut s = screen();
        s.put(Glyph::Byte(b'x'), Attr::Recalled).unwrap();
        assert_eq!(s.cells()[0], b'x' as u16 | COLOR_RECALLED);
    }

    #[test]
    fn test_newline_moves_to_next_row() {
        let mut s = screen();
        s.put(Glyph::Byte(b'a'), Attr::Normal).unwrap();
        s.put(Glyph::Byte(b'\n'), Attr::Normal).unwrap();
        assert_eq!(s.cursor(), SCREEN_COLS);
    }

    #[test]
    fn test_backspace_blanks_previous_cell() {
        let mut s = screen();
        s.put(Glyph::Byte(b'a'), Attr::Normal).unwrap();
        s.put(Glyph::Backspace, Attr::Normal).unwrap();
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.cells()[0], BLANK);
    }

    #[test]
    fn test_backspace_at_origin_stays_put() {
        let mut s = screen();
        s.put(Glyph::Backspace, Attr::Normal).unwrap();
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_scrolls_at_last_usable_row() {
        let mut s = TextScreen::new(
            vec![0u16; SCREEN_ROWS * SCREEN_COLS],
            SoftCursor((SCROLL_ROW - 1) * SCREEN_COLS),
        );
        s.cells.as_mut_slice()[SCREEN_COLS] = b'k' as u16 | COLOR_NORMAL;
        s.put(Glyph::Byte(b'z'), Attr::Normal).unwrap();
        s.put(Glyph::Byte(b'\n'), Attr::Normal).unwrap();

        // Row 1 moved to row 0, and the cursor stays on the last usable row.
        assert_eq!(s.cells()[0], b'k' as u16 | COLOR_NORMAL);
        assert_eq!(s.cursor(), (SCROLL_ROW - 1) * SCREEN_COLS);
        assert_eq!(s.cells()[(SCROLL_ROW - 2) * SCREEN_COLS], b'z' as u16 | COLOR_NORMAL);
    }

    #[test]
    fn test_cursor_out_of_range_is_an_error() {
        let mut s = TextScreen::new(
            vec![0u16; SCREEN_ROWS * SCREEN_COLS],
            SoftCursor(SCREEN_ROWS * SCREEN_COLS + 5),
        );
        assert_eq!(
            s.put(Glyph::Byte(b'a'), Attr::Normal),
            Err(ScreenError::PositionOutOfRange(SCREEN_ROWS * SCREEN_COLS + 5))
        );
    }
}
