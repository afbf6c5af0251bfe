//! CGA text-mode memory and the CRT controller cursor.

use x86_64::instructions::port::Port;

use crate::config::{SCREEN_COLS, SCREEN_ROWS};
use crate::tty::text_screen::CursorPort;

/// CRT controller index register.
const CRTPORT: u16 = 0x3D4;

/// Physical address of CGA text memory.
pub const CGA_PHYS: u64 = 0xB8000;

/// Cursor position held in CRT registers 14 (high) and 15 (low).
pub struct CrtCursor {
    index: Port<u8>,
    data: Port<u8>,
}

impl CrtCursor {
    pub const fn new() -> Self {
        Self {
            index: Port::new(CRTPORT),
            data: Port::new(CRTPORT + 1),
        }
    }
}

impl CursorPort for CrtCursor {
    fn get(&mut self) -> usize {
        unsafe {
            self.index.write(14);
            let hi = self.data.read() as usize;
            self.index.write(15);
            let lo = self.data.read() as usize;
            (hi << 8) | lo
        }
    }

    fn set(&mut self, pos: usize) {
        unsafe {
            self.index.write(14);
            self.data.write((pos >> 8) as u8);
            self.index.write(15);
            self.data.write(pos as u8);
        }
    }
}

/// The text cells at `virt`, the kernel mapping of [`CGA_PHYS`].
///
/// # Safety
/// `virt` must map the CGA buffer for the rest of the kernel's life and no
/// other reference to it may exist.
pub unsafe fn cga_cells(virt: *mut u16) -> &'static mut [u16] {
    core::slice::from_raw_parts_mut(virt, SCREEN_COLS * SCREEN_ROWS)
}
