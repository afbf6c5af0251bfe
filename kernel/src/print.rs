//! Kernel printer
//!
//! Backs `kprint!`, `kprintln!` and `kpanic!`. The console installs itself
//! once during bring-up; before that, prints are dropped.

use core::fmt;

use conquer_once::spin::OnceCell;

use crate::arch_impl::Cpu;

/// A device that can carry kernel messages and report a fatal error.
pub trait KernelConsole: Sync {
    fn print(&self, args: fmt::Arguments<'_>);
    fn panic(&self, args: fmt::Arguments<'_>) -> !;
}

static PRINTER: OnceCell<&'static dyn KernelConsole> = OnceCell::uninit();

/// Route kernel output to `console`. Returns false if a printer was already
/// installed.
pub fn install(console: &'static dyn KernelConsole) -> bool {
    PRINTER.try_init_once(|| console).is_ok()
}

pub fn is_installed() -> bool {
    PRINTER.is_initialized()
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments<'_>) {
    if let Some(console) = PRINTER.get() {
        console.print(args);
    }
}

#[doc(hidden)]
pub fn _panic(args: fmt::Arguments<'_>) -> ! {
    if let Some(console) = PRINTER.get() {
        console.panic(args);
    }
    halt_unreported()
}

/// A panic before any printer is installed has nowhere to go: stop the CPU
/// with interrupts off.
#[cfg_attr(not(all(feature = "hw", target_arch = "x86_64")), allow(dead_code))]
fn halt_without_printer<C: Cpu + ?Sized>(cpu: &C) -> ! {
    cpu.disable_interrupts();
    cpu.freeze()
}

#[cfg(all(feature = "hw", target_arch = "x86_64"))]
fn halt_unreported() -> ! {
    halt_without_printer(&crate::arch_impl::x86_64::X86Cpu)
}

/// Without a hardware backend there is no CPU to stop; spin in place.
#[cfg(not(all(feature = "hw", target_arch = "x86_64")))]
fn halt_unreported() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
