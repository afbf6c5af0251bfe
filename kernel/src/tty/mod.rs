//! Console TTY
//!
//! Line-edited keyboard input with a short command history, echoed to a
//! text-mode display and mirrored to the serial port.
//!
//! - `key` decodes raw keyboard/UART codes
//! - `edit_ring` holds typed input until a reader consumes it
//! - `history` keeps the last few committed lines for recall
//! - `line_discipline` applies editing keys to the ring
//! - `output` / `text_screen` render echo
//! - `driver` ties it to interrupts, readers and the kernel printer

pub mod driver;
pub mod edit_ring;
pub mod history;
pub mod key;
pub mod line_discipline;
pub mod output;
pub mod text_screen;

use core::fmt;

use crate::config::CONSOLE_MAJOR;
use crate::fs::devsw::{DeviceError, DeviceTable, DEVSW};
use crate::tty::output::{Display, SerialSink};
use crate::task::Platform;

pub use driver::{Console, KeyQueue};
pub use line_discipline::LineDiscipline;

/// Errors surfaced to console readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtyError {
    /// The reader was killed while waiting for input
    Killed,
}

impl fmt::Display for TtyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtyError::Killed => write!(f, "Process killed while reading console"),
        }
    }
}

/// Register `console` as the console device in `table`.
pub fn console_init<D, S, P>(
    table: &mut DeviceTable,
    console: &'static Console<D, S, P>,
) -> Result<(), DeviceError>
where
    D: Display + Send + 'static,
    S: SerialSink + Send + 'static,
    P: Platform + 'static,
{
    table.register(CONSOLE_MAJOR, console)?;
    log::info!("Console TTY initialized (major {})", CONSOLE_MAJOR);
    Ok(())
}

/// Bring up the system console: register it in the global device switch and
/// route `kprint!` / `kpanic!` through it.
pub fn init<D, S, P>(console: &'static Console<D, S, P>) -> Result<(), DeviceError>
where
    D: Display + Send + 'static,
    S: SerialSink + Send + 'static,
    P: Platform + 'static,
{
    console_init(&mut DEVSW.lock(), console)?;
    if !crate::print::install(console) {
        log::warn!("console: kernel printer already installed");
    }
    Ok(())
}
