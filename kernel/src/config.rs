//! Compile-time console configuration.
//!
//! The editing behaviour depends on these values being exact: the ring
//! capacity, history depth and screen geometry are part of the observable
//! contract, so they are constants rather than runtime settings.

/// Capacity of the console input ring, in bytes.
pub const INPUT_BUF: usize = 128;

/// Number of committed lines kept for recall.
pub const HISTORY_DEPTH: usize = 3;

/// Text-mode screen width in cells.
pub const SCREEN_COLS: usize = 80;

/// Text-mode screen height in cells.
pub const SCREEN_ROWS: usize = 25;

/// Rows usable before the screen scrolls. The last row is left free.
pub const SCROLL_ROW: usize = 24;

/// Attribute for ordinary output (light grey on black).
pub const COLOR_NORMAL: u16 = 0x0700;

/// Attribute for text recalled from history (green on black).
pub const COLOR_RECALLED: u16 = 0x0200;

/// Number of caller addresses printed by a fatal halt.
pub const PANIC_PCS: usize = 10;

/// Size of the character device switch table.
pub const NDEV: usize = 10;

/// Major number the console registers under.
pub const CONSOLE_MAJOR: usize = 1;

/// Capacity of the IRQ-to-drain-loop key queue.
pub const KEY_QUEUE_SIZE: usize = 256;
