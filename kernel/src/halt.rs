//! Fatal halt
//!
//! Once the kernel decides an error is unrecoverable it prints a message and a
//! short backtrace, trips a one-way latch and spins forever. Every output path
//! checks the latch first, so a second CPU that tries to print afterwards
//! freezes instead of scribbling over the screen being kept for postmortem.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicBool, Ordering};

use crate::arch_impl::Cpu;
use crate::config::PANIC_PCS;

/// Write-once latch. There is no way back from `raised`.
pub struct FatalHalt {
    raised: AtomicBool,
}

impl FatalHalt {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Freeze the calling CPU if a halt has already been raised.
    #[inline]
    pub fn trap_if_raised<C: Cpu + ?Sized>(&self, cpu: &C) {
        if self.is_raised() {
            cpu.disable_interrupts();
            cpu.freeze();
        }
    }

    /// Print `message` with the caller's return addresses, trip the latch and
    /// never return.
    ///
    /// `out` must bypass the halt check; the latch is set only after the
    /// message has been written.
    pub fn raise<W, C>(&self, out: &mut W, cpu: &C, message: fmt::Arguments<'_>) -> !
    where
        W: Write + ?Sized,
        C: Cpu + ?Sized,
    {
        cpu.disable_interrupts();

        let _ = write!(out, "lapicid {}: panic: ", cpu.id());
        let _ = out.write_fmt(message);
        let _ = out.write_str("\n");

        let mut pcs = [0usize; PANIC_PCS];
        cpu.caller_pcs(&mut pcs);
        for pc in pcs {
            let _ = write!(out, " {:x}", pc);
        }

        self.raised.store(true, Ordering::Release);
        log::error!("fatal halt on cpu {}", cpu.id());
        cpu.freeze()
    }

    #[cfg(test)]
    pub(crate) fn force_raised(&self) {
        self.raised.store(true, Ordering::Release);
    }
}

impl Default for FatalHalt {
    fn default() -> Self {
        Self::new()
    }
}
