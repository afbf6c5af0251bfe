//! Console key codes
//!
//! The keyboard and UART handlers deliver one code at a time. Ordinary keys
//! are 8-bit values; the shifted arrow keys arrive as out-of-band codes above
//! `0xFF` so they can never collide with typed bytes.

/// Control-x
pub const fn ctrl(x: u8) -> u8 {
    x - b'@'
}

/// Shifted form of an extended key (`KEY_UP`, `KEY_DN`)
pub const fn shift(x: u16) -> u16 {
    x + b'@' as u16
}

pub const CTRL_H: u8 = ctrl(b'H');
pub const CTRL_U: u8 = ctrl(b'U');
pub const CTRL_P: u8 = ctrl(b'P');
pub const DEL: u8 = 0x7F;

/// End-of-file sentinel, stored in-band in the input ring.
pub const EOF_CHAR: u8 = ctrl(b'D');

pub const KEY_UP: u16 = 0xE2;
pub const KEY_DN: u16 = 0xE3;

/// Code delivered for history-up.
pub const HISTORY_UP: u16 = shift(KEY_UP);
/// Code delivered for history-down.
pub const HISTORY_DOWN: u16 = shift(KEY_DN);

/// A decoded console key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Any byte that goes into the input ring, including `^D`
    Char(u8),
    /// Backspace or DEL
    Erase,
    /// Ctrl-U
    KillLine,
    /// Ctrl-P, process listing
    ProcDump,
    HistoryUp,
    HistoryDown,
    /// NUL and unknown extended codes
    Ignored,
}

impl Key {
    pub fn from_code(code: u16) -> Self {
        match code {
            HISTORY_UP => Key::HistoryUp,
            HISTORY_DOWN => Key::HistoryDown,
            0 | 0x100..=u16::MAX => Key::Ignored,
            _ => match code as u8 {
                CTRL_P => Key::ProcDump,
                CTRL_U => Key::KillLine,
                CTRL_H | DEL => Key::Erase,
                c => Key::Char(c),
            },
        }
    }
}

impl From<u16> for Key {
    fn from(code: u16) -> Self {
        Key::from_code(code)
    }
}

/// Pull-style source of raw key codes, drained at interrupt time.
pub trait KeySource {
    /// Next pending code, or `None` when the source is empty.
    fn next_code(&mut self) -> Option<u16>;
}

/// Key source over any iterator of codes.
pub struct Codes<I>(pub I);

impl<I> KeySource for Codes<I>
where
    I: Iterator<Item = u16>,
{
    fn next_code(&mut self) -> Option<u16> {
        self.0.next()
    }
}
