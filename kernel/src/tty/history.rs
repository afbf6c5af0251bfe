//! Command history
//!
//! A most-recently-used stack of the last [`HISTORY_DEPTH`] non-empty lines,
//! plus the navigation state used by the history-up/down keys.

use crate::config::{HISTORY_DEPTH, INPUT_BUF};

/// One saved line. Terminators are never stored.
#[derive(Clone, Copy)]
struct SavedLine {
    text: [u8; INPUT_BUF],
    len: usize,
}

impl SavedLine {
    const EMPTY: SavedLine = SavedLine {
        text: [0; INPUT_BUF],
        len: 0,
    };

    fn as_bytes(&self) -> &[u8] {
        &self.text[..self.len]
    }
}

/// Saved lines, most recent at index 0.
pub struct HistoryStack {
    lines: [SavedLine; HISTORY_DEPTH],
    count: usize,
}

impl HistoryStack {
    pub const fn new() -> Self {
        Self {
            lines: [SavedLine::EMPTY; HISTORY_DEPTH],
            count: 0,
        }
    }

    /// Push a line, displacing the oldest entry once the stack is full.
    /// Lines longer than a ring's worth are truncated.
    pub fn push(&mut self, line: &[u8]) {
        self.lines.copy_within(0..HISTORY_DEPTH - 1, 1);

        let len = line.len().min(INPUT_BUF);
        let slot = &mut self.lines[0];
        slot.text[..len].copy_from_slice(&line[..len]);
        slot.text[len..].fill(0);
        slot.len = len;

        if self.count < HISTORY_DEPTH {
            self.count += 1;
        }
    }

    /// Entry `index`, where 0 is the most recent.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if index < self.count {
            Some(self.lines[index].as_bytes())
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the edit line came from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Recall {
    /// Live editing, not browsing history
    #[default]
    Live,
    /// The edit line shows a copy of history entry `n`
    Browsing(usize),
}

/// What a navigation key asks the line discipline to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Replace the edit line with history entry `n`
    Show(usize),
    /// Erase the edit line and return to live editing
    Clear,
    /// Nothing to do
    Stay,
}

impl Recall {
    /// Step towards older entries.
    pub fn up(&mut self, available: usize) -> Navigation {
        let next = match *self {
            Recall::Live => 0,
            Recall::Browsing(k) => k + 1,
        };
        if next < available {
            *self = Recall::Browsing(next);
            Navigation::Show(next)
        } else {
            Navigation::Stay
        }
    }

    /// Step towards newer entries, ending at an empty live line.
    pub fn down(&mut self) -> Navigation {
        match *self {
            Recall::Live => Navigation::Stay,
            Recall::Browsing(0) => {
                *self = Recall::Live;
                Navigation::Clear
            }
            Recall::Browsing(k) => {
                *self = Recall::Browsing(k - 1);
                Navigation::Show(k - 1)
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Recall::Live;
    }
}
