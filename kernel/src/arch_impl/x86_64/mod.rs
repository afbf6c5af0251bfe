//! x86_64 hardware backend: CPU control, CGA text memory with the CRT
//! cursor, the COM1 serial mirror and the COM2 log port.

pub mod cga;
pub mod cpu;
pub mod uart;

pub use cga::{cga_cells, CrtCursor, CGA_PHYS};
pub use cpu::X86Cpu;
pub use uart::{ComMirror, LogPort};

use crate::task::Platform;
use crate::tty::text_screen::TextScreen;
use crate::tty::Console;

/// The console on PC hardware: CGA text memory, CRT cursor, COM1 mirror.
pub type PcConsole<P> = Console<TextScreen<&'static mut [u16], CrtCursor>, ComMirror, P>;

/// Build the PC console around the kernel's scheduler hooks.
///
/// # Safety
/// `cga_virt` must map [`CGA_PHYS`] for the rest of the kernel's life, and
/// nothing else may drive the CGA buffer, the CRT controller or COM1.
pub unsafe fn pc_console<P: Platform>(cga_virt: *mut u16, platform: P) -> PcConsole<P> {
    let screen = TextScreen::new(cga_cells(cga_virt), CrtCursor::new());
    Console::new(screen, ComMirror::com1(), platform)
}
