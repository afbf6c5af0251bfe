//! Console Line Discipline
//!
//! Turns raw key codes into edited, line-buffered input:
//!
//! - **Editing**: backspace/DEL erases one character, Ctrl-U the whole line
//! - **Commit**: newline, Ctrl-D or a full ring seals the line for readers
//! - **History**: committed lines are saved and can be recalled with the
//!   shifted arrow keys
//! - **Echo**: every accepted character is echoed back
//!
//! This is a pure state machine. It runs at interrupt time with the console
//! lock held, so it is handed an echo sink and nothing that can sleep.

use crate::config::INPUT_BUF;

use super::edit_ring::EditRing;
use super::history::{HistoryStack, Navigation, Recall};
use super::key::{Key, EOF_CHAR};
use super::output::{Attr, EchoSink, Glyph};

/// Result of processing one key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    /// A line was committed; readers should be woken
    pub committed: bool,
    /// Ctrl-P was seen; run the process listing once the lock is dropped
    pub dump_requested: bool,
}

pub struct LineDiscipline {
    ring: EditRing,
    history: HistoryStack,
    recall: Recall,
}

impl LineDiscipline {
    pub const fn new() -> Self {
        Self {
            ring: EditRing::new(),
            history: HistoryStack::new(),
            recall: Recall::Live,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_ring(ring: EditRing) -> Self {
        Self {
            ring,
            history: HistoryStack::new(),
            recall: Recall::Live,
        }
    }

    /// Process one key.
    pub fn handle_key(&mut self, key: Key, echo: &mut dyn EchoSink) -> KeyOutcome {
        let mut outcome = KeyOutcome::default();

        match key {
            Key::ProcDump => outcome.dump_requested = true,
            Key::KillLine => {
                self.recall.reset();
                self.erase_line(echo);
            }
            Key::Erase => {
                if self.ring.pop() {
                    echo.echo(Glyph::Backspace, Attr::Normal);
                    self.recall.reset();
                }
            }
            Key::HistoryUp => {
                let nav = self.recall.up(self.history.len());
                self.navigate(nav, echo);
            }
            Key::HistoryDown => {
                let nav = self.recall.down();
                self.navigate(nav, echo);
            }
            Key::Char(c) => outcome.committed = self.insert(c, echo),
            Key::Ignored => {}
        }

        outcome
    }

    /// Append a typed byte. Returns true if it committed the line.
    fn insert(&mut self, c: u8, echo: &mut dyn EchoSink) -> bool {
        let c = if c == b'\r' { b'\n' } else { c };

        if !self.ring.push(c) {
            // Full: never overwrite unread input.
            log::trace!("console: input ring full, dropping {:#04x}", c);
            return false;
        }
        self.recall.reset();
        echo.echo(Glyph::Byte(c), Attr::Normal);

        if c == b'\n' || c == EOF_CHAR || self.ring.is_full() {
            self.commit(c);
            return true;
        }
        false
    }

    fn commit(&mut self, last: u8) {
        let mut line = [0u8; INPUT_BUF];
        let mut len = self.ring.copy_line(&mut line);
        if last == b'\n' || last == EOF_CHAR {
            len -= 1;
        }
        if len > 0 {
            self.history.push(&line[..len]);
            log::debug!("console: saved {} byte line to history", len);
        }
        self.ring.commit();
    }

    /// Erase the uncommitted line back to the commit boundary.
    fn erase_line(&mut self, echo: &mut dyn EchoSink) {
        while self.ring.pop() {
            echo.echo(Glyph::Backspace, Attr::Normal);
        }
    }

    fn navigate(&mut self, nav: Navigation, echo: &mut dyn EchoSink) {
        match nav {
            Navigation::Show(index) => self.show_entry(index, echo),
            Navigation::Clear => self.erase_line(echo),
            Navigation::Stay => {}
        }
    }

    /// Replace the edit line with history entry `index`.
    fn show_entry(&mut self, index: usize, echo: &mut dyn EchoSink) {
        self.erase_line(echo);

        let Some(text) = self.history.get(index) else {
            return;
        };
        for &c in text {
            if !self.ring.push(c) {
                break;
            }
            echo.echo(Glyph::Byte(c), Attr::Recalled);
        }
    }

    pub fn ring(&self) -> &EditRing {
        &self.ring
    }

    pub fn ring_mut(&mut self) -> &mut EditRing {
        &mut self.ring
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn recall(&self) -> Recall {
        self.recall
    }
}

impl Default for LineDiscipline {
    fn default() -> Self {
        Self::new()
    }
}
